use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::auth;
use crate::common::toast::ToastContext;
use crate::router::Route;
use crate::session::SessionContext;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let session_ctx = use_context::<SessionContext>().unwrap();
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let navigator = use_navigator().unwrap();
    let email_ref = use_node_ref();
    let password_ref = use_node_ref();
    let is_submitting = use_state(|| false);
    let error_message = use_state(|| None::<String>);

    if session_ctx.is_signed_in() {
        return html! { <Redirect<Route> to={Route::Home} /> };
    }

    let on_submit = {
        let email_ref = email_ref.clone();
        let password_ref = password_ref.clone();
        let is_submitting = is_submitting.clone();
        let error_message = error_message.clone();
        let sign_in = session_ctx.sign_in.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *is_submitting {
                return;
            }
            let (Some(email), Some(password)) = (
                email_ref.cast::<HtmlInputElement>(),
                password_ref.cast::<HtmlInputElement>(),
            ) else {
                return;
            };
            let (email, password) = (email.value(), password.value());

            is_submitting.set(true);
            error_message.set(None);

            let is_submitting = is_submitting.clone();
            let error_message = error_message.clone();
            let sign_in = sign_in.clone();
            let navigator = navigator.clone();
            let toast_ctx = toast_ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match auth::login(&email, &password).await {
                    Ok(session) => {
                        toast_ctx.show_success(format!("Welcome back, {}!", session.user.name));
                        sign_in.emit(session);
                        navigator.push(&Route::Home);
                    }
                    Err(e) => {
                        log::warn!("Login failed: {}", e);
                        error_message.set(Some(e.to_string()));
                        is_submitting.set(false);
                    }
                }
            });
        })
    };

    html! {
        <div class="card bg-base-100 shadow-sm max-w-md mx-auto">
            <form class="card-body gap-4" onsubmit={on_submit}>
                {if let Some(error) = (*error_message).as_ref() {
                    html! { <div class="alert alert-error"><span>{error}</span></div> }
                } else {
                    html! {}
                }}
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Email"}</span></label>
                    <input ref={email_ref} type="email" required={true} autocomplete="username" class="input input-bordered" />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Password"}</span></label>
                    <input ref={password_ref} type="password" required={true} autocomplete="current-password" class="input input-bordered" />
                </div>
                <button type="submit" class="btn btn-primary" disabled={*is_submitting}>{"Login"}</button>
                <p class="text-sm text-center">
                    {"No account yet? "}
                    <Link<Route> to={Route::Register} classes={classes!("link", "link-primary")}>{"Register"}</Link<Route>>
                </p>
            </form>
        </div>
    }
}
