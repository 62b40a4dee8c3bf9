use std::future::Future;
use std::rc::Rc;

use yew::prelude::*;

use crate::api_client::ApiResult;
use crate::common::toast::ToastContext;
use crate::hooks::FetchState;
use crate::session::SessionContext;

/// Runs `fetch_fn` on mount and whenever `deps` changes; the returned
/// callback runs it again on demand.
///
/// A 401 ends the local session, since the token is no longer accepted.
#[hook]
pub fn use_fetch_with_refetch<T, D, F, Fut>(deps: D, fetch_fn: F) -> (UseStateHandle<FetchState<T>>, Callback<()>)
where
    T: 'static,
    D: PartialEq + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let fetch_state = use_state(|| FetchState::Loading);
    let toast_ctx = use_context::<ToastContext>().unwrap();
    let session_ctx = use_context::<SessionContext>().unwrap();
    // Always holds the closure of the latest render.
    let latest = use_mut_ref(|| None::<Rc<F>>);
    *latest.borrow_mut() = Some(Rc::new(fetch_fn));

    let refetch = {
        let fetch_state = fetch_state.clone();
        let latest = latest.clone();
        let sign_out = session_ctx.sign_out.clone();

        Callback::from(move |_| {
            let Some(fetch_fn) = latest.borrow().clone() else {
                return;
            };
            let fut = fetch_fn();
            let fetch_state = fetch_state.clone();
            let toast_ctx = toast_ctx.clone();
            let sign_out = sign_out.clone();

            fetch_state.set(FetchState::Loading);

            wasm_bindgen_futures::spawn_local(async move {
                match fut.await {
                    Ok(data) => fetch_state.set(FetchState::Success(data)),
                    Err(err) => {
                        if err.is_unauthenticated() {
                            sign_out.emit(());
                        }
                        fetch_state.set(FetchState::Error(err.to_string()));
                        toast_ctx.show_error(err.to_string());
                    }
                }
            });
        })
    };

    {
        let refetch = refetch.clone();
        use_effect_with(deps, move |_| {
            refetch.emit(());
            || ()
        });
    }

    (fetch_state, refetch)
}
