use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::layout::layout::Layout;
use crate::components::listings::Listings;
use crate::pages::edit_listing::EditListingPage;
use crate::pages::liked::LikedPage;
use crate::pages::listing_detail::ListingDetailPage;
use crate::pages::login::LoginPage;
use crate::pages::new_listing::NewListingPage;
use crate::pages::profile::ProfilePage;
use crate::pages::register::RegisterPage;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/listings/new")]
    NewListing,
    #[at("/listings/:id")]
    ListingDetail { id: i32 },
    #[at("/listings/:id/edit")]
    EditListing { id: i32 },
    #[at("/liked")]
    Liked,
    #[at("/profile")]
    Profile,
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    log::debug!("Routing to: {:?}", routes);
    match routes {
        Route::Home => html! { <Layout title="Listings"><Listings /></Layout> },
        Route::Login => html! { <Layout title="Login"><LoginPage /></Layout> },
        Route::Register => html! { <Layout title="Register"><RegisterPage /></Layout> },
        Route::NewListing => html! { <Layout title="New Listing"><NewListingPage /></Layout> },
        Route::ListingDetail { id } => html! {
            <Layout title="Listing"><ListingDetailPage {id} /></Layout>
        },
        Route::EditListing { id } => html! {
            <Layout title="Edit Listing"><EditListingPage {id} /></Layout>
        },
        Route::Liked => html! { <Layout title="Liked Listings"><LikedPage /></Layout> },
        Route::Profile => html! { <Layout title="Profile"><ProfilePage /></Layout> },
        Route::NotFound => {
            log::warn!("404 - Route not found");
            html! { <Layout title="404"><p>{"This page does not exist."}</p></Layout> }
        }
    }
}
