use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::auth;
use crate::router::Route;
use crate::session::SessionContext;

#[function_component(Navbar)]
pub fn navbar() -> Html {
    let session_ctx = use_context::<SessionContext>().unwrap();
    let navigator = use_navigator().unwrap();

    let on_logout = {
        let session_ctx = session_ctx.clone();
        Callback::from(move |_| {
            let Some(session) = session_ctx.session.clone() else {
                return;
            };
            let sign_out = session_ctx.sign_out.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                // The local session ends even if the server call fails.
                if let Err(e) = auth::logout(&session).await {
                    log::warn!("Logout request failed: {}", e);
                }
                sign_out.emit(());
                navigator.push(&Route::Home);
            });
        })
    };

    let links = match &session_ctx.session {
        Some(session) => html! {
            <>
                <li><Link<Route> to={Route::NewListing}>{"New Listing"}</Link<Route>></li>
                <li><Link<Route> to={Route::Liked}>{"Liked"}</Link<Route>></li>
                <li><Link<Route> to={Route::Profile}>{ &session.user.name }</Link<Route>></li>
                <li><button onclick={on_logout}>{"Logout"}</button></li>
            </>
        },
        None => html! {
            <>
                <li><Link<Route> to={Route::Login}>{"Login"}</Link<Route>></li>
                <li><Link<Route> to={Route::Register}>{"Register"}</Link<Route>></li>
            </>
        },
    };

    html! {
        <div class="navbar bg-base-100 shadow-sm z-40 sticky top-0">
            <div class="flex-1 px-4">
                <Link<Route> to={Route::Home} classes={classes!("text-xl", "font-bold")}>
                    <i class="fas fa-home mr-2"></i>{"EstateHub"}
                </Link<Route>>
            </div>
            <div class="flex-none">
                <ul class="menu menu-horizontal px-1 gap-1">
                    <li><Link<Route> to={Route::Home}>{"Browse"}</Link<Route>></li>
                    {links}
                </ul>
            </div>
        </div>
    }
}
