//! Explicit client session.
//!
//! The session is acquired at login, handed to every authenticated API call
//! and cleared at logout. It lives in a Yew context; persisting it to
//! `localStorage` is done here, by the provider, and nowhere else.

use common::{ListingDto, LoginResponse, UserDto};
use serde::{Deserialize, Serialize};
use web_sys::window;
use yew::prelude::*;

const STORAGE_KEY: &str = "estatehub_session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserDto,
}

impl Session {
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn owns(&self, listing: &ListingDto) -> bool {
        listing.user_id == self.user.id
    }
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct SessionContext {
    pub session: Option<Session>,
    pub sign_in: Callback<Session>,
    pub sign_out: Callback<()>,
    pub update_user: Callback<UserDto>,
}

impl SessionContext {
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}

fn load_stored() -> Option<Session> {
    let storage = window()?.local_storage().ok()??;
    let raw = storage.get_item(STORAGE_KEY).ok()??;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Discarding unreadable stored session: {}", e);
            let _ = storage.remove_item(STORAGE_KEY);
            None
        }
    }
}

fn store(session: Option<&Session>) {
    let Some(storage) = window().and_then(|w| w.local_storage().ok().flatten()) else {
        log::warn!("localStorage unavailable, session will not survive a reload");
        return;
    };
    let result = match session.map(serde_json::to_string) {
        Some(Ok(raw)) => storage.set_item(STORAGE_KEY, &raw),
        Some(Err(e)) => {
            log::error!("Failed to serialize session: {}", e);
            return;
        }
        None => storage.remove_item(STORAGE_KEY),
    };
    if let Err(e) = result {
        log::error!("Failed to persist session: {:?}", e);
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let session = use_state(load_stored);

    let sign_in = {
        let session = session.clone();
        Callback::from(move |new_session: Session| {
            log::info!("Signed in as {}", new_session.user.email);
            store(Some(&new_session));
            session.set(Some(new_session));
        })
    };

    let sign_out = {
        let session = session.clone();
        Callback::from(move |_| {
            log::info!("Signed out");
            store(None);
            session.set(None);
        })
    };

    let update_user = {
        let session = session.clone();
        Callback::from(move |user: UserDto| {
            if let Some(current) = (*session).clone() {
                let updated = Session { user, ..current };
                store(Some(&updated));
                session.set(Some(updated));
            }
        })
    };

    let context = SessionContext {
        session: (*session).clone(),
        sign_in,
        sign_out,
        update_user,
    };

    html! {
        <ContextProvider<SessionContext> context={context}>
            {props.children.clone()}
        </ContextProvider<SessionContext>>
    }
}
