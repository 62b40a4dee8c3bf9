use common::{FieldErrors, ListingRequest};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::listing;
use crate::common::toast::ToastContext;
use crate::components::listings::ListingForm;
use crate::router::Route;
use crate::session::SessionContext;

#[function_component(NewListingPage)]
pub fn new_listing_page() -> Html {
    let session_ctx = use_context::<SessionContext>().unwrap();
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let navigator = use_navigator().unwrap();
    let submitting = use_state(|| false);
    let server_errors = use_state(FieldErrors::new);

    let Some(session) = session_ctx.session.clone() else {
        return html! { <Redirect<Route> to={Route::Login} /> };
    };

    let on_submit = {
        let submitting = submitting.clone();
        let server_errors = server_errors.clone();
        let sign_out = session_ctx.sign_out.clone();

        Callback::from(move |request: ListingRequest| {
            submitting.set(true);
            let session = session.clone();
            let submitting = submitting.clone();
            let server_errors = server_errors.clone();
            let navigator = navigator.clone();
            let toast_ctx = toast_ctx.clone();
            let sign_out = sign_out.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match listing::create_listing(&session, &request).await {
                    Ok(created) => {
                        toast_ctx.show_success(format!("Listing \"{}\" created.", created.title));
                        navigator.push(&Route::ListingDetail { id: created.id });
                    }
                    Err(e) => {
                        submitting.set(false);
                        if e.is_unauthenticated() {
                            sign_out.emit(());
                        }
                        toast_ctx.show_error(e.to_string());
                        server_errors.set(e.errors);
                    }
                }
            });
        })
    };

    html! {
        <ListingForm
            submit_label="Create listing"
            {on_submit}
            server_errors={(*server_errors).clone()}
            submitting={*submitting}
        />
    }
}
