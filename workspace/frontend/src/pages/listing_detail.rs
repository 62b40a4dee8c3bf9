use common::ListingDto;
use common::price::{format_area, format_price_millions};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api_client::{like, listing};
use crate::common::error::ErrorDisplay;
use crate::common::fetch_hook::use_fetch_with_refetch;
use crate::common::loading::Loading;
use crate::common::toast::ToastContext;
use crate::components::listings::{LikeButton, LocationLink};
use crate::hooks::{FetchState, use_liked_ids};
use crate::router::Route;
use crate::session::SessionContext;

#[derive(Properties, PartialEq)]
pub struct ListingDetailPageProps {
    pub id: i32,
}

#[function_component(ListingDetailPage)]
pub fn listing_detail_page(props: &ListingDetailPageProps) -> Html {
    let id = props.id;
    let session_ctx = use_context::<SessionContext>().unwrap();
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let navigator = use_navigator().unwrap();
    let (fetch_state, refetch) = use_fetch_with_refetch(id, move || listing::get_listing(id));
    let (liked, toggle_like) = use_liked_ids();
    let likes = use_state(|| None::<u64>);
    let deleting = use_state(|| false);

    // Re-count whenever the caller's own like flips.
    {
        let likes = likes.clone();
        let session = session_ctx.session.clone();
        let is_liked = liked.contains(id);
        use_effect_with((id, is_liked, session), move |(id, _, session)| {
            let id = *id;
            match session.clone() {
                Some(session) => wasm_bindgen_futures::spawn_local(async move {
                    match like::likes_count(&session, id).await {
                        Ok(count) => likes.set(Some(count)),
                        Err(e) => log::warn!("Could not count likes of listing {}: {}", id, e),
                    }
                }),
                None => likes.set(None),
            }
            || ()
        });
    }

    let on_delete = {
        let session = session_ctx.session.clone();
        let deleting = deleting.clone();
        Callback::from(move |_| {
            let Some(session) = session.clone() else {
                return;
            };
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Delete this listing for good?").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            deleting.set(true);
            let deleting = deleting.clone();
            let navigator = navigator.clone();
            let toast_ctx = toast_ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match listing::delete_listing(&session, id).await {
                    Ok(()) => {
                        toast_ctx.show_success("Listing deleted.".to_string());
                        navigator.push(&Route::Home);
                    }
                    Err(e) => {
                        deleting.set(false);
                        toast_ctx.show_error(e.to_string());
                    }
                }
            });
        })
    };

    let listing = match &*fetch_state {
        FetchState::Success(listing) => listing.clone(),
        FetchState::Error(message) => {
            return html! { <ErrorDisplay message={message.clone()} on_retry={Some(refetch)} /> };
        }
        FetchState::Loading | FetchState::NotStarted => return html! { <Loading /> },
    };

    let is_owner = session_ctx
        .session
        .as_ref()
        .is_some_and(|session| session.owns(&listing));

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="lg:col-span-2 space-y-4">
                <Gallery listing={listing.clone()} />
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body">
                        <h2 class="card-title text-2xl">{ &listing.title }</h2>
                        <p class="text-gray-500">{format!("{}, {}", listing.address, listing.city)}</p>
                        {for listing.description.as_ref().map(|d| html! {
                            <p class="whitespace-pre-line mt-2">{d}</p>
                        })}
                    </div>
                </div>
            </div>
            <div class="space-y-4">
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body gap-3">
                        <div class="flex justify-between items-center">
                            <span class="text-2xl font-bold text-primary">{format_price_millions(listing.price)}</span>
                            {if session_ctx.is_signed_in() {
                                html! {
                                    <div class="flex items-center gap-1">
                                        <LikeButton listing_id={id} liked={liked.contains(id)} on_toggle={toggle_like} />
                                        <span class="text-sm">{likes.map(|n| n.to_string()).unwrap_or_default()}</span>
                                    </div>
                                }
                            } else {
                                html! {}
                            }}
                        </div>
                        <table class="table table-sm">
                            <tbody>
                                <tr><th>{"Type"}</th><td>{listing.property_type.label()}</td></tr>
                                <tr><th>{"Area"}</th><td>{format_area(listing.area)}</td></tr>
                                <tr><th>{"Bedrooms"}</th><td>{listing.bedrooms.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())}</td></tr>
                                <tr><th>{"Bathrooms"}</th><td>{listing.bathrooms.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())}</td></tr>
                                {for listing.phone_number.as_ref().map(|phone| html! {
                                    <tr><th>{"Phone"}</th><td><a class="link" href={format!("tel:{}", phone)}>{phone}</a></td></tr>
                                })}
                                {for listing.email.as_ref().map(|email| html! {
                                    <tr><th>{"Email"}</th><td><a class="link" href={format!("mailto:{}", email)}>{email}</a></td></tr>
                                })}
                            </tbody>
                        </table>
                        {match (listing.lat, listing.lng) {
                            (Some(lat), Some(lng)) => html! { <LocationLink {lat} {lng} /> },
                            _ => html! {},
                        }}
                    </div>
                </div>
                {if is_owner {
                    html! {
                        <div class="flex gap-2">
                            <Link<Route> to={Route::EditListing { id }} classes={classes!("btn", "btn-outline", "flex-1")}>
                                <i class="fas fa-edit"></i>{" Edit"}
                            </Link<Route>>
                            <button class="btn btn-error btn-outline flex-1" onclick={on_delete} disabled={*deleting}>
                                <i class="fas fa-trash"></i>{" Delete"}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct GalleryProps {
    listing: ListingDto,
}

#[function_component(Gallery)]
fn gallery(props: &GalleryProps) -> Html {
    let selected = use_state(|| 0usize);
    let images = &props.listing.images;

    let Some(current) = images.get(*selected).or_else(|| images.first()) else {
        return html! {
            <div class="h-72 rounded-box bg-base-300 flex items-center justify-center">
                <i class="fas fa-image text-5xl text-gray-400"></i>
            </div>
        };
    };

    html! {
        <div class="space-y-2">
            <img src={current.clone()} alt={props.listing.title.clone()} class="w-full max-h-[28rem] object-cover rounded-box" />
            if images.len() > 1 {
                <div class="flex gap-2 overflow-x-auto">
                    {for images.iter().enumerate().map(|(i, src)| {
                        let selected = selected.clone();
                        let active = *selected == i;
                        html! {
                            <img
                                src={src.clone()}
                                class={classes!("h-16", "w-24", "object-cover", "rounded", "cursor-pointer", active.then_some(classes!("ring-2", "ring-primary")))}
                                onclick={Callback::from(move |_| selected.set(i))}
                            />
                        }
                    })}
                </div>
            }
        </div>
    }
}
