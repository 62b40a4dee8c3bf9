use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

#[function_component(ErrorDisplay)]
pub fn error_display(props: &ErrorDisplayProps) -> Html {
    log::warn!("Displaying error to user: {}", props.message);

    let retry = props.on_retry.clone().map(|on_retry| {
        html! {
            <button
                class="btn btn-primary btn-sm"
                onclick={Callback::from(move |_| {
                    log::debug!("User clicked retry button");
                    on_retry.emit(());
                })}
            >
                <i class="fas fa-redo"></i>
                {" Try Again"}
            </button>
        }
    });

    html! {
        <div class="flex flex-col items-center justify-center py-12 gap-4">
            <div class="alert alert-error max-w-lg">
                <i class="fas fa-exclamation-circle text-2xl"></i>
                <div class="flex flex-col gap-2">
                    <span class="font-semibold">{"Could not load data"}</span>
                    <span class="text-sm">{&props.message}</span>
                </div>
            </div>
            {retry}
        </div>
    }
}

/// Inline message under a form field.
#[derive(Properties, PartialEq)]
pub struct FieldErrorProps {
    #[prop_or_default]
    pub message: Option<String>,
}

#[function_component(FieldError)]
pub fn field_error(props: &FieldErrorProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <label class="label"><span class="label-text-alt text-error">{message}</span></label>
        },
        None => html! {},
    }
}
