use common::ListingDto;
use common::price::{format_area, format_price_millions};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[derive(Properties, PartialEq)]
pub struct LikeButtonProps {
    pub listing_id: i32,
    pub liked: bool,
    pub on_toggle: Callback<i32>,
}

#[function_component(LikeButton)]
pub fn like_button(props: &LikeButtonProps) -> Html {
    let onclick = {
        let on_toggle = props.on_toggle.clone();
        let listing_id = props.listing_id;
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            e.stop_propagation();
            on_toggle.emit(listing_id);
        })
    };
    let (icon, title) = if props.liked {
        ("fas fa-heart text-error", "Unlike")
    } else {
        ("far fa-heart", "Like")
    };

    html! {
        <button class="btn btn-ghost btn-circle btn-sm" {title} {onclick}>
            <i class={icon}></i>
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ListingCardProps {
    pub listing: ListingDto,
    pub liked: bool,
    /// `None` hides the like button
    #[prop_or_default]
    pub on_toggle_like: Option<Callback<i32>>,
}

#[function_component(ListingCard)]
pub fn listing_card(props: &ListingCardProps) -> Html {
    let listing = &props.listing;
    let cover = listing.images.first().cloned();

    html! {
        <div class="card bg-base-100 shadow-sm hover:shadow-md transition-shadow">
            {match cover {
                Some(src) => html! {
                    <figure class="h-48 overflow-hidden">
                        <img src={src} alt={listing.title.clone()} class="w-full object-cover" />
                    </figure>
                },
                None => html! {
                    <figure class="h-48 bg-base-300 flex items-center justify-center">
                        <i class="fas fa-image text-4xl text-gray-400"></i>
                    </figure>
                },
            }}
            <div class="card-body p-4">
                <div class="flex justify-between items-start gap-2">
                    <Link<Route> to={Route::ListingDetail { id: listing.id }} classes={classes!("card-title", "text-lg", "link-hover")}>
                        { &listing.title }
                    </Link<Route>>
                    {if let Some(on_toggle) = &props.on_toggle_like {
                        html! { <LikeButton listing_id={listing.id} liked={props.liked} on_toggle={on_toggle.clone()} /> }
                    } else {
                        html! {}
                    }}
                </div>
                <p class="text-sm text-gray-500">
                    <i class="fas fa-map-marker-alt mr-1"></i>
                    {format!("{}, {}", listing.address, listing.city)}
                </p>
                <p class="text-xl font-semibold text-primary">{format_price_millions(listing.price)}</p>
                <div class="flex flex-wrap gap-2 text-sm">
                    <span class="badge badge-outline">{listing.property_type.label()}</span>
                    <span class="badge badge-ghost">{format_area(listing.area)}</span>
                    {for listing.bedrooms.map(|n| html! {
                        <span class="badge badge-ghost"><i class="fas fa-bed mr-1"></i>{n}</span>
                    })}
                    {for listing.bathrooms.map(|n| html! {
                        <span class="badge badge-ghost"><i class="fas fa-bath mr-1"></i>{n}</span>
                    })}
                </div>
            </div>
        </div>
    }
}
