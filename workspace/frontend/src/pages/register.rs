use common::{FieldErrors, RegisterRequest};
use web_sys::{FormData, HtmlFormElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::auth;
use crate::common::error::FieldError;
use crate::common::toast::ToastContext;
use crate::router::Route;
use crate::session::SessionContext;

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let session_ctx = use_context::<SessionContext>().unwrap();
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let navigator = use_navigator().unwrap();
    let form_ref = use_node_ref();
    let is_submitting = use_state(|| false);
    let errors = use_state(FieldErrors::new);

    if session_ctx.is_signed_in() {
        return html! { <Redirect<Route> to={Route::Home} /> };
    }

    let on_submit = {
        let form_ref = form_ref.clone();
        let is_submitting = is_submitting.clone();
        let errors = errors.clone();
        let sign_in = session_ctx.sign_in.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *is_submitting {
                return;
            }
            let Some(data) = form_ref
                .cast::<HtmlFormElement>()
                .and_then(|form| FormData::new_with_form(&form).ok())
            else {
                return;
            };
            let get = |name: &str| data.get(name).as_string().unwrap_or_default();
            let request = RegisterRequest {
                name: get("name").trim().to_string(),
                email: get("email").trim().to_string(),
                password: get("password"),
                password_confirmation: get("password_confirmation"),
            };

            if let Err(field_errors) = request.validate_registration() {
                errors.set(field_errors);
                return;
            }

            is_submitting.set(true);
            errors.set(FieldErrors::new());

            let is_submitting = is_submitting.clone();
            let errors = errors.clone();
            let sign_in = sign_in.clone();
            let navigator = navigator.clone();
            let toast_ctx = toast_ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = match auth::register(&request).await {
                    Ok(_) => auth::login(&request.email, &request.password).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(session) => {
                        toast_ctx.show_success("Account created.".to_string());
                        sign_in.emit(session);
                        navigator.push(&Route::Home);
                    }
                    Err(e) => {
                        if e.errors.is_empty() {
                            toast_ctx.show_error(e.to_string());
                        }
                        errors.set(e.errors);
                        is_submitting.set(false);
                    }
                }
            });
        })
    };

    let error_for = |field: &str| errors.get(field).and_then(|m| m.first().cloned());

    html! {
        <div class="card bg-base-100 shadow-sm max-w-md mx-auto">
            <form ref={form_ref} class="card-body gap-2" onsubmit={on_submit}>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Name"}</span></label>
                    <input name="name" type="text" maxlength="255" class="input input-bordered" />
                    <FieldError message={error_for("name")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Email"}</span></label>
                    <input name="email" type="email" autocomplete="username" class="input input-bordered" />
                    <FieldError message={error_for("email")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Password"}</span></label>
                    <input name="password" type="password" autocomplete="new-password" class="input input-bordered" />
                    <FieldError message={error_for("password")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Confirm password"}</span></label>
                    <input name="password_confirmation" type="password" autocomplete="new-password" class="input input-bordered" />
                </div>
                <button type="submit" class="btn btn-primary mt-4" disabled={*is_submitting}>{"Create account"}</button>
                <p class="text-sm text-center">
                    {"Already registered? "}
                    <Link<Route> to={Route::Login} classes={classes!("link", "link-primary")}>{"Login"}</Link<Route>>
                </p>
            </form>
        </div>
    }
}
