use common::{FilterCriteria, filter_listings};
use yew::prelude::*;

use super::filter_panel::FilterPanel;
use super::listing_card::ListingCard;
use super::map_view::MapView;
use crate::api_client::listing;
use crate::common::fetch_hook::use_fetch_with_refetch;
use crate::common::error::ErrorDisplay;
use crate::common::loading::Loading;
use crate::hooks::{FetchState, use_liked_ids};
use crate::session::SessionContext;

#[derive(Clone, Copy, PartialEq)]
enum ViewMode {
    Grid,
    Map,
}

/// Browse view: every listing, narrowed by the filter panel.
#[function_component(Listings)]
pub fn listings() -> Html {
    let session_ctx = use_context::<SessionContext>().unwrap();
    let (fetch_state, refetch) = use_fetch_with_refetch((), listing::get_listings);
    let criteria = use_state(FilterCriteria::default);
    let mode = use_state(|| ViewMode::Grid);
    let (liked, toggle_like) = use_liked_ids();

    let on_criteria = {
        let criteria = criteria.clone();
        Callback::from(move |next: FilterCriteria| {
            log::trace!("Filter criteria changed: {:?}", next);
            criteria.set(next);
        })
    };

    let mode_button = |target: ViewMode, icon: &'static str, label: &'static str| {
        let mode = mode.clone();
        let active = *mode == target;
        html! {
            <button
                class={classes!("btn", "btn-sm", "join-item", active.then_some("btn-active"))}
                onclick={Callback::from(move |_| mode.set(target))}
            >
                <i class={icon}></i>{format!(" {}", label)}
            </button>
        }
    };

    let content = match &*fetch_state {
        FetchState::Success(all) => {
            // Re-run on every render, so a criteria change shows at once.
            let shown = filter_listings(all, &criteria);
            let on_toggle_like = session_ctx.is_signed_in().then_some(toggle_like);
            let body = match *mode {
                ViewMode::Map => html! { <MapView listings={shown.clone()} /> },
                ViewMode::Grid if shown.is_empty() => html! {
                    <div class="alert alert-info">
                        <i class="fas fa-info-circle"></i>
                        <span>{"No listings match the filters."}</span>
                    </div>
                },
                ViewMode::Grid => html! {
                    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                        {for shown.iter().map(|l| html! {
                            <ListingCard
                                key={l.id}
                                listing={l.clone()}
                                liked={liked.contains(l.id)}
                                on_toggle_like={on_toggle_like.clone()}
                            />
                        })}
                    </div>
                },
            };

            html! {
                <>
                    <FilterPanel
                        criteria={(*criteria).clone()}
                        on_change={on_criteria}
                        shown={shown.len()}
                        total={all.len()}
                    />
                    {body}
                </>
            }
        }
        FetchState::Error(message) => html! {
            <ErrorDisplay message={message.clone()} on_retry={Some(refetch)} />
        },
        FetchState::Loading | FetchState::NotStarted => html! {
            <Loading text={Some("Loading listings...".to_string())} />
        },
    };

    html! {
        <div>
            <div class="flex justify-end mb-4">
                <div class="join">
                    {mode_button(ViewMode::Grid, "fas fa-th-large", "Grid")}
                    {mode_button(ViewMode::Map, "fas fa-map", "Map")}
                </div>
            </div>
            {content}
        </div>
    }
}
