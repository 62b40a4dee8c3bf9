use common::{FieldErrors, UpdateProfileRequest, UserDto};
use web_sys::{FormData, HtmlFormElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::user;
use crate::common::error::FieldError;
use crate::common::toast::ToastContext;
use crate::router::Route;
use crate::session::SessionContext;

/// Only what differs from the current record is sent; an empty password
/// field leaves the password alone.
fn changed_fields(current: &UserDto, name: &str, email: &str, password: &str, confirmation: &str, current_password: &str) -> UpdateProfileRequest {
    let name = name.trim();
    let email = email.trim();
    let mut request = UpdateProfileRequest::default();
    if !name.is_empty() && name != current.name {
        request.name = Some(name.to_string());
    }
    if !email.is_empty() && !email.eq_ignore_ascii_case(&current.email) {
        request.email = Some(email.to_string());
    }
    if !password.is_empty() {
        request.password = Some(password.to_string());
        request.password_confirmation = Some(confirmation.to_string());
        request.current_password = Some(current_password.to_string());
    }
    request
}

#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let session_ctx = use_context::<SessionContext>().unwrap();
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let form_ref = use_node_ref();
    let is_submitting = use_state(|| false);
    let errors = use_state(FieldErrors::new);

    let Some(session) = session_ctx.session.clone() else {
        return html! { <Redirect<Route> to={Route::Login} /> };
    };

    let on_submit = {
        let form_ref = form_ref.clone();
        let is_submitting = is_submitting.clone();
        let errors = errors.clone();
        let session = session.clone();
        let update_user = session_ctx.update_user.clone();

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
            let request = changed_fields(
                &session.user,
                &get("name"),
                &get("email"),
                &get("password"),
                &get("password_confirmation"),
                &get("current_password"),
            );

            if request == UpdateProfileRequest::default() {
                toast_ctx.show_info("Nothing to update.".to_string());
                return;
            }
            if let Err(field_errors) = request.validate_profile() {
                errors.set(field_errors);
                return;
            }

            is_submitting.set(true);
            errors.set(FieldErrors::new());

            let session = session.clone();
            let is_submitting = is_submitting.clone();
            let errors = errors.clone();
            let update_user = update_user.clone();
            let toast_ctx = toast_ctx.clone();
            let form_ref = form_ref.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match user::update_profile(&session, &request).await {
                    Ok(response) => {
                        toast_ctx.show_success(response.message);
                        update_user.emit(response.user);
                        if let Some(form) = form_ref.cast::<HtmlFormElement>() {
                            form.reset();
                        }
                    }
                    Err(e) => {
                        if e.errors.is_empty() {
                            toast_ctx.show_error(e.to_string());
                        }
                        errors.set(e.errors);
                    }
                }
                is_submitting.set(false);
            });
        })
    };

    let error_for = |field: &str| errors.get(field).and_then(|m| m.first().cloned());
    let current = &session.user;

    html! {
        <div class="card bg-base-100 shadow-sm max-w-lg">
            <form ref={form_ref} class="card-body gap-2" onsubmit={on_submit}>
                <p class="text-sm text-gray-500">
                    {format!("Member since {}", current.created_at.format("%Y-%m-%d"))}
                </p>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Name"}</span></label>
                    <input name="name" type="text" maxlength="255" class="input input-bordered" value={current.name.clone()} />
                    <FieldError message={error_for("name")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Email"}</span></label>
                    <input name="email" type="email" class="input input-bordered" value={current.email.clone()} />
                    <FieldError message={error_for("email")} />
                </div>
                <div class="divider text-sm">{"Change password"}</div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"New password"}</span></label>
                    <input name="password" type="password" autocomplete="new-password" class="input input-bordered" />
                    <FieldError message={error_for("password")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Confirm new password"}</span></label>
                    <input name="password_confirmation" type="password" autocomplete="new-password" class="input input-bordered" />
                    <FieldError message={error_for("password_confirmation")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Current password"}</span></label>
                    <input name="current_password" type="password" autocomplete="current-password" class="input input-bordered" />
                    <FieldError message={error_for("current_password")} />
                </div>
                <button type="submit" class="btn btn-primary mt-4" disabled={*is_submitting}>{"Save profile"}</button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn anna() -> UserDto {
        UserDto {
            id: 1,
            name: "Anna".to_string(),
            email: "anna@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unchanged_form_sends_nothing() {
        let request = changed_fields(&anna(), "Anna", "ANNA@example.com", "", "", "");
        assert_eq!(request, UpdateProfileRequest::default());
    }

    #[test]
    fn test_password_change_carries_confirmation_and_current() {
        let request = changed_fields(&anna(), "Anna K", "anna@example.com", "new secret", "new secret", "old secret");
        assert_eq!(request.name.as_deref(), Some("Anna K"));
        assert_eq!(request.email, None);
        assert_eq!(request.password.as_deref(), Some("new secret"));
        assert_eq!(request.current_password.as_deref(), Some("old secret"));
    }
}
