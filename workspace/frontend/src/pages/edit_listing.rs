use common::{FieldErrors, ListingRequest};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::listing;
use crate::common::error::ErrorDisplay;
use crate::common::fetch_hook::use_fetch_with_refetch;
use crate::common::loading::Loading;
use crate::common::toast::ToastContext;
use crate::components::listings::ListingForm;
use crate::hooks::FetchState;
use crate::router::Route;
use crate::session::SessionContext;

#[derive(Properties, PartialEq)]
pub struct EditListingPageProps {
    pub id: i32,
}

#[function_component(EditListingPage)]
pub fn edit_listing_page(props: &EditListingPageProps) -> Html {
    let id = props.id;
    let session_ctx = use_context::<SessionContext>().unwrap();
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let navigator = use_navigator().unwrap();
    let (fetch_state, refetch) = use_fetch_with_refetch(id, move || listing::get_listing(id));
    let submitting = use_state(|| false);
    let server_errors = use_state(FieldErrors::new);

    let Some(session) = session_ctx.session.clone() else {
        return html! { <Redirect<Route> to={Route::Login} /> };
    };

    let on_submit = {
        let session = session.clone();
        let submitting = submitting.clone();
        let server_errors = server_errors.clone();

        Callback::from(move |request: ListingRequest| {
            submitting.set(true);
            let session = session.clone();
            let submitting = submitting.clone();
            let server_errors = server_errors.clone();
            let navigator = navigator.clone();
            let toast_ctx = toast_ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match listing::update_listing(&session, id, &request).await {
                    Ok(updated) => {
                        toast_ctx.show_success("Listing updated.".to_string());
                        navigator.push(&Route::ListingDetail { id: updated.id });
                    }
                    Err(e) => {
                        submitting.set(false);
                        toast_ctx.show_error(e.to_string());
                        server_errors.set(e.errors);
                    }
                }
            });
        })
    };

    match &*fetch_state {
        FetchState::Success(existing) if !session.owns(existing) => html! {
            <div class="alert alert-warning">
                <i class="fas fa-lock"></i>
                <span>{"You can only edit your own listings."}</span>
            </div>
        },
        FetchState::Success(existing) => html! {
            <ListingForm
                initial={Some(existing.clone())}
                submit_label="Save changes"
                {on_submit}
                server_errors={(*server_errors).clone()}
                submitting={*submitting}
            />
        },
        FetchState::Error(message) => html! {
            <ErrorDisplay message={message.clone()} on_retry={Some(refetch)} />
        },
        FetchState::Loading | FetchState::NotStarted => html! { <Loading /> },
    }
}
