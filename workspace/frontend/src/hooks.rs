use std::collections::BTreeSet;
use std::rc::Rc;

use common::ListingDto;
use yew::prelude::*;

use crate::api_client::like;
use crate::common::toast::ToastContext;
use crate::session::SessionContext;

/// API fetch state enum
#[derive(Clone, PartialEq)]
pub enum FetchState<T> {
    NotStarted,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }
}

/// IDs of the listings the signed-in user likes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LikedIds(BTreeSet<i32>);

pub enum LikedAction {
    Replace(Vec<i32>),
    Set { listing_id: i32, liked: bool },
    Clear,
}

impl LikedIds {
    pub fn contains(&self, listing_id: i32) -> bool {
        self.0.contains(&listing_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn apply(&self, action: LikedAction) -> Self {
        let mut ids = self.0.clone();
        match action {
            LikedAction::Replace(new_ids) => ids = new_ids.into_iter().collect(),
            LikedAction::Set { listing_id, liked: true } => {
                ids.insert(listing_id);
            }
            LikedAction::Set { listing_id, liked: false } => {
                ids.remove(&listing_id);
            }
            LikedAction::Clear => ids.clear(),
        }
        Self(ids)
    }
}

impl Reducible for LikedIds {
    type Action = LikedAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}

/// Liked listing IDs of the current session plus an optimistic toggle.
///
/// The toggle flips the local set at once, then settles on the server's
/// answer, or flips back if the request fails.
#[hook]
pub fn use_liked_ids() -> (UseReducerHandle<LikedIds>, Callback<i32>) {
    let liked = use_reducer(LikedIds::default);
    let session_ctx = use_context::<SessionContext>().unwrap();
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let session = session_ctx.session.clone();

    {
        let liked = liked.clone();
        let toast_ctx = toast_ctx.clone();
        use_effect_with(session.clone(), move |session| {
            match session.clone() {
                Some(session) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        match like::liked_listings(&session).await {
                            Ok(listings) => liked.dispatch(LikedAction::Replace(
                                listings.iter().map(|l: &ListingDto| l.id).collect(),
                            )),
                            Err(e) => toast_ctx.show_error(format!("Could not load liked listings: {}", e)),
                        }
                    });
                }
                None => liked.dispatch(LikedAction::Clear),
            }
            || ()
        });
    }

    let toggle = {
        let liked = liked.clone();
        Callback::from(move |listing_id: i32| {
            let Some(session) = session.clone() else {
                toast_ctx.show_warning("Log in to like listings.".to_string());
                return;
            };

            let was_liked = liked.contains(listing_id);
            liked.dispatch(LikedAction::Set {
                listing_id,
                liked: !was_liked,
            });

            let liked = liked.clone();
            let toast_ctx = toast_ctx.clone();
            let sign_out = session_ctx.sign_out.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match like::toggle_like(&session, listing_id).await {
                    Ok(response) => liked.dispatch(LikedAction::Set {
                        listing_id,
                        liked: response.liked,
                    }),
                    Err(e) => {
                        log::warn!("Reverting like on listing {}: {}", listing_id, e);
                        liked.dispatch(LikedAction::Set {
                            listing_id,
                            liked: was_liked,
                        });
                        if e.is_unauthenticated() {
                            sign_out.emit(());
                        }
                        toast_ctx.show_error(e.to_string());
                    }
                }
            });
        })
    };

    (liked, toggle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_revert_restores_original_membership() {
        let ids = LikedIds::default().apply(LikedAction::Replace(vec![1, 3]));
        let optimistic = ids.apply(LikedAction::Set { listing_id: 2, liked: true });
        assert!(optimistic.contains(2));

        let reverted = optimistic.apply(LikedAction::Set { listing_id: 2, liked: false });
        assert_eq!(reverted, ids);
    }

    #[test]
    fn test_clear_empties_the_set() {
        let ids = LikedIds::default().apply(LikedAction::Replace(vec![5]));
        assert_eq!(ids.len(), 1);
        assert!(ids.apply(LikedAction::Clear).is_empty());
    }
}
