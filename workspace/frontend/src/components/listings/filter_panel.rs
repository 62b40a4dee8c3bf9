use common::price::{millions_to_raw, price_in_millions};
use common::{FilterCriteria, PropertyType, PropertyTypeFilter};
use rust_decimal::Decimal;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Empty or unparsable input means "no bound".
pub(crate) fn parse_bound(value: &str) -> Option<Decimal> {
    value.trim().parse::<Decimal>().ok().filter(|d| !d.is_sign_negative())
}

pub(crate) fn parse_count(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

fn bound_text(value: Option<Decimal>) -> String {
    value.map(|d| d.normalize().to_string()).unwrap_or_default()
}

fn count_text(value: u32) -> String {
    if value == 0 { String::new() } else { value.to_string() }
}

#[derive(Clone, Copy)]
enum Field {
    Query,
    MinPrice,
    MaxPrice,
    MinBedrooms,
    MinBathrooms,
    MinArea,
    MaxArea,
}

/// Returns a copy of `criteria` with one field replaced by the input text.
/// Price inputs are in millions; the criteria keep raw units.
fn with_field(criteria: &FilterCriteria, field: Field, value: &str) -> FilterCriteria {
    let mut next = criteria.clone();
    match field {
        Field::Query => next.query = value.to_string(),
        Field::MinPrice => next.min_price = parse_bound(value).map(millions_to_raw),
        Field::MaxPrice => next.max_price = parse_bound(value).map(millions_to_raw),
        Field::MinBedrooms => next.min_bedrooms = parse_count(value),
        Field::MinBathrooms => next.min_bathrooms = parse_count(value),
        Field::MinArea => next.min_area = parse_bound(value),
        Field::MaxArea => next.max_area = parse_bound(value),
    }
    next
}

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
    pub criteria: FilterCriteria,
    pub on_change: Callback<FilterCriteria>,
    pub shown: usize,
    pub total: usize,
}

#[function_component(FilterPanel)]
pub fn filter_panel(props: &FilterPanelProps) -> Html {
    let on_input = |field: Field| {
        let criteria = props.criteria.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_change.emit(with_field(&criteria, field, &input.value()));
        })
    };

    let on_type = {
        let criteria = props.criteria.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = criteria.clone();
            next.property_type = select.value().parse().unwrap_or_default();
            on_change.emit(next);
        })
    };

    let on_reset = {
        let criteria = props.criteria.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |_| {
            let mut next = criteria.clone();
            next.reset();
            on_change.emit(next);
        })
    };

    let criteria = &props.criteria;
    let selected_type = match criteria.property_type {
        PropertyTypeFilter::All => "",
        PropertyTypeFilter::Only(t) => t.as_str(),
    };

    html! {
        <div class="card bg-base-100 shadow-sm mb-6">
            <div class="card-body gap-4">
                <div class="flex flex-wrap gap-4 items-end">
                    <div class="form-control flex-1 min-w-64">
                        <label class="label"><span class="label-text">{"Search title or address"}</span></label>
                        <input
                            type="search"
                            class="input input-bordered"
                            placeholder="e.g. Kossuth"
                            value={criteria.query.clone()}
                            oninput={on_input(Field::Query)}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Property type"}</span></label>
                        <select class="select select-bordered" onchange={on_type}>
                            <option value="" selected={selected_type.is_empty()}>
                                {PropertyTypeFilter::ALL_TYPES_LABEL}
                            </option>
                            {for PropertyType::ALL.iter().map(|t| html! {
                                <option value={t.as_str()} selected={selected_type == t.as_str()}>{t.label()}</option>
                            })}
                        </select>
                    </div>
                </div>
                <div class="grid grid-cols-2 md:grid-cols-6 gap-4">
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Min price (million)"}</span></label>
                        <input type="number" min="0" step="0.01" class="input input-bordered input-sm"
                            value={bound_text(criteria.min_price.map(price_in_millions))}
                            oninput={on_input(Field::MinPrice)} />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Max price (million)"}</span></label>
                        <input type="number" min="0" step="0.01" class="input input-bordered input-sm"
                            value={bound_text(criteria.max_price.map(price_in_millions))}
                            oninput={on_input(Field::MaxPrice)} />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Bedrooms"}</span></label>
                        <input type="number" min="0" class="input input-bordered input-sm"
                            value={count_text(criteria.min_bedrooms)}
                            oninput={on_input(Field::MinBedrooms)} />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Bathrooms"}</span></label>
                        <input type="number" min="0" class="input input-bordered input-sm"
                            value={count_text(criteria.min_bathrooms)}
                            oninput={on_input(Field::MinBathrooms)} />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Min area (m²)"}</span></label>
                        <input type="number" min="0" class="input input-bordered input-sm"
                            value={bound_text(criteria.min_area)}
                            oninput={on_input(Field::MinArea)} />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Max area (m²)"}</span></label>
                        <input type="number" min="0" class="input input-bordered input-sm"
                            value={bound_text(criteria.max_area)}
                            oninput={on_input(Field::MaxArea)} />
                    </div>
                </div>
                <div class="flex justify-between items-center">
                    <span class="text-sm text-gray-500">
                        {format!("Showing {} of {} listings", props.shown, props.total)}
                    </span>
                    <button class="btn btn-ghost btn-sm" onclick={on_reset} disabled={criteria.is_empty()}>
                        <i class="fas fa-undo"></i>{" Reset filters"}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_inputs_are_millions() {
        let criteria = with_field(&FilterCriteria::default(), Field::MinPrice, "0.8");
        assert_eq!(criteria.min_price, Some(Decimal::new(800_000, 0)));
        assert_eq!(bound_text(criteria.min_price.map(price_in_millions)), "0.8");
    }

    #[test]
    fn test_blank_or_invalid_inputs_clear_the_bound() {
        let criteria = FilterCriteria {
            max_area: Some(Decimal::new(100, 0)),
            min_bedrooms: 2,
            ..Default::default()
        };
        let criteria = with_field(&criteria, Field::MaxArea, "");
        let criteria = with_field(&criteria, Field::MinBedrooms, "abc");
        assert_eq!(criteria.max_area, None);
        assert_eq!(criteria.min_bedrooms, 0);
        assert!(criteria.is_empty());
        assert_eq!(parse_bound("-3"), None);
    }
}
