use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::like;
use crate::common::error::ErrorDisplay;
use crate::common::fetch_hook::use_fetch_with_refetch;
use crate::common::loading::Loading;
use crate::components::listings::ListingCard;
use crate::hooks::{FetchState, use_liked_ids};
use crate::router::Route;
use crate::session::SessionContext;

/// Listings the signed-in user liked. Unliking here keeps the card visible
/// until the next visit so a misclick can be undone.
#[function_component(LikedPage)]
pub fn liked_page() -> Html {
    let session_ctx = use_context::<SessionContext>().unwrap();
    let session = session_ctx.session.clone();
    let (fetch_state, refetch) = use_fetch_with_refetch(session.clone(), move || {
        let session = session.clone();
        async move {
            match session {
                Some(session) => like::liked_listings(&session).await,
                None => Ok(Vec::new()),
            }
        }
    });
    let (liked, toggle_like) = use_liked_ids();

    if !session_ctx.is_signed_in() {
        return html! { <Redirect<Route> to={Route::Login} /> };
    }

    match &*fetch_state {
        FetchState::Success(listings) if listings.is_empty() => html! {
            <div class="alert alert-info">
                <i class="fas fa-info-circle"></i>
                <span>{"You have not liked any listings yet."}</span>
            </div>
        },
        FetchState::Success(listings) => html! {
            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                {for listings.iter().map(|l| html! {
                    <ListingCard
                        key={l.id}
                        listing={l.clone()}
                        liked={liked.contains(l.id)}
                        on_toggle_like={Some(toggle_like.clone())}
                    />
                })}
            </div>
        },
        FetchState::Error(message) => html! {
            <ErrorDisplay message={message.clone()} on_retry={Some(refetch)} />
        },
        FetchState::Loading | FetchState::NotStarted => html! { <Loading /> },
    }
}
