use common::validation::push_field_error;
use common::{FieldErrors, ListingDto, ListingRequest, MAX_LISTING_IMAGES, PropertyType};
use std::rc::Rc;
use std::str::FromStr;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{File, FileReader, FormData, HtmlFormElement, HtmlInputElement};
use yew::prelude::*;

use crate::common::error::FieldError;

/// Raw text of every form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ListingFormFields {
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub price: String,
    pub area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub address: String,
    pub city: String,
    pub lat: String,
    pub lng: String,
    pub phone_number: String,
    pub email: String,
    /// One image URL per line
    pub images: String,
    /// Uploaded files as data URLs, sent after the typed URLs
    pub uploads: Vec<String>,
}

impl ListingFormFields {
    fn from_form_data(data: &FormData, uploads: Vec<String>) -> Self {
        let get = |name: &str| data.get(name).as_string().unwrap_or_default();
        Self {
            title: get("title"),
            description: get("description"),
            property_type: get("type"),
            price: get("price"),
            area: get("area"),
            bedrooms: get("bedrooms"),
            bathrooms: get("bathrooms"),
            address: get("address"),
            city: get("city"),
            lat: get("lat"),
            lng: get("lng"),
            phone_number: get("phoneNumber"),
            email: get("email"),
            images: get("images"),
            uploads,
        }
    }

    /// Parses the inputs and runs the same rules the server applies.
    pub(crate) fn to_request(&self) -> Result<ListingRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let text = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        let price = parse_field(&mut errors, "price", &self.price, "Must be a number.");
        let area = parse_field(&mut errors, "area", &self.area, "Must be a number.");
        let lat = parse_field(&mut errors, "lat", &self.lat, "Must be a number.");
        let lng = parse_field(&mut errors, "lng", &self.lng, "Must be a number.");
        let bedrooms = parse_field(&mut errors, "bedrooms", &self.bedrooms, "Must be a whole number.");
        let bathrooms = parse_field(&mut errors, "bathrooms", &self.bathrooms, "Must be a whole number.");

        let property_type = match text(&self.property_type) {
            Some(value) => match value.parse::<PropertyType>() {
                Ok(t) => Some(t),
                Err(e) => {
                    push_field_error(&mut errors, "type", e);
                    None
                }
            },
            None => None,
        };

        let request = ListingRequest {
            title: text(&self.title),
            description: text(&self.description),
            property_type,
            price,
            area,
            bedrooms,
            bathrooms,
            address: text(&self.address),
            city: text(&self.city),
            lat,
            lng,
            phone_number: text(&self.phone_number),
            email: text(&self.email),
            images: self
                .images
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .chain(self.uploads.iter().cloned())
                .collect(),
        };

        if let Err(rule_errors) = request.validate_listing() {
            for (field, messages) in rule_errors {
                for message in messages {
                    push_field_error(&mut errors, &field, message);
                }
            }
        }

        if errors.is_empty() { Ok(request) } else { Err(errors) }
    }
}

/// Blank input is `None`; anything else must parse.
fn parse_field<T: FromStr>(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            push_field_error(errors, field, message);
            None
        }
    }
}

/// Splits stored images into typed URLs and uploaded data URLs.
fn split_images(images: &[String]) -> (Vec<String>, Vec<String>) {
    images
        .iter()
        .cloned()
        .partition(|image| !image.starts_with("data:"))
}

/// Images picked from disk, in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct UploadedImages(pub Vec<String>);

pub(crate) enum UploadAction {
    Add(String),
    Remove(usize),
}

impl Reducible for UploadedImages {
    type Action = UploadAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut images = self.0.clone();
        match action {
            UploadAction::Add(url) if images.len() < MAX_LISTING_IMAGES => images.push(url),
            UploadAction::Add(_) => log::warn!("Image cap reached, dropping upload"),
            UploadAction::Remove(index) if index < images.len() => {
                images.remove(index);
            }
            UploadAction::Remove(_) => {}
        }
        Rc::new(Self(images))
    }
}

fn read_as_data_url(file: &File, on_loaded: Callback<String>) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            log::error!("Failed to create file reader: {:?}", e);
            return;
        }
    };
    let onload = {
        let reader = reader.clone();
        let name = file.name();
        Closure::once_into_js(move |_: Event| {
            match reader.result().ok().and_then(|result| result.as_string()) {
                Some(url) => on_loaded.emit(url),
                None => log::warn!("Could not read {} as a data URL", name),
            }
        })
    };
    reader.set_onload(Some(onload.unchecked_ref()));
    if let Err(e) = reader.read_as_data_url(file) {
        log::error!("Failed to read {}: {:?}", file.name(), e);
    }
}

fn opt_text<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[derive(Properties, PartialEq)]
pub struct ListingFormProps {
    /// Prefilled values when editing
    #[prop_or_default]
    pub initial: Option<ListingDto>,
    pub submit_label: String,
    pub on_submit: Callback<ListingRequest>,
    /// Errors reported by the server
    #[prop_or_default]
    pub server_errors: FieldErrors,
    #[prop_or_default]
    pub submitting: bool,
}

#[function_component(ListingForm)]
pub fn listing_form(props: &ListingFormProps) -> Html {
    let form_ref = use_node_ref();
    let local_errors = use_state(FieldErrors::new);
    let (initial_urls, initial_uploads) = props
        .initial
        .as_ref()
        .map(|l| split_images(&l.images))
        .unwrap_or_default();
    let uploads = use_reducer(move || UploadedImages(initial_uploads));

    let on_files = {
        let uploads = uploads.clone();
        let local_errors = local_errors.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(files) = input.files() else {
                return;
            };
            let selected: Vec<File> = (0..files.length())
                .filter_map(|i| files.get(i))
                .filter(|file| file.type_().starts_with("image/"))
                .collect();
            input.set_value("");

            if uploads.0.len() + selected.len() > MAX_LISTING_IMAGES {
                let mut errors = (*local_errors).clone();
                errors.remove("images");
                push_field_error(
                    &mut errors,
                    "images",
                    format!("You can upload at most {} images.", MAX_LISTING_IMAGES),
                );
                local_errors.set(errors);
                return;
            }

            let add = {
                let uploads = uploads.clone();
                Callback::from(move |url: String| uploads.dispatch(UploadAction::Add(url)))
            };
            for file in &selected {
                read_as_data_url(file, add.clone());
            }
        })
    };

    let on_submit = {
        let form_ref = form_ref.clone();
        let local_errors = local_errors.clone();
        let on_submit = props.on_submit.clone();
        let submitting = props.submitting;
        let uploads = uploads.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if submitting {
                return;
            }
            let Some(form) = form_ref.cast::<HtmlFormElement>() else {
                return;
            };
            let data = match FormData::new_with_form(&form) {
                Ok(data) => data,
                Err(e) => {
                    log::error!("Failed to read listing form: {:?}", e);
                    return;
                }
            };

            match ListingFormFields::from_form_data(&data, uploads.0.clone()).to_request() {
                Ok(request) => {
                    local_errors.set(FieldErrors::new());
                    on_submit.emit(request);
                }
                Err(errors) => {
                    log::debug!("Listing form has errors on {:?}", errors.keys().collect::<Vec<_>>());
                    local_errors.set(errors);
                }
            }
        })
    };

    let error_for = |field: &str| -> Option<String> {
        local_errors
            .get(field)
            .or_else(|| props.server_errors.get(field))
            .and_then(|messages| messages.first().cloned())
    };

    let initial = props.initial.clone();
    let value = |f: fn(&ListingDto) -> String| initial.as_ref().map(f).unwrap_or_default();
    let selected_type = initial
        .as_ref()
        .map(|l| l.property_type.as_str())
        .unwrap_or_default();

    html! {
        <form ref={form_ref} onsubmit={on_submit} class="card bg-base-100 shadow-sm">
            <div class="card-body grid grid-cols-1 md:grid-cols-2 gap-4">
                <div class="form-control md:col-span-2">
                    <label class="label"><span class="label-text">{"Title"}</span></label>
                    <input type="text" name="title" maxlength="255" class="input input-bordered"
                        value={value(|l| l.title.clone())} />
                    <FieldError message={error_for("title")} />
                </div>
                <div class="form-control md:col-span-2">
                    <label class="label"><span class="label-text">{"Description"}</span></label>
                    <textarea name="description" class="textarea textarea-bordered" rows="4"
                        value={value(|l| opt_text(&l.description))} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Property type"}</span></label>
                    <select name="type" class="select select-bordered">
                        <option value="" disabled={true} selected={selected_type.is_empty()}>{"Choose a type"}</option>
                        {for PropertyType::ALL.iter().map(|t| html! {
                            <option value={t.as_str()} selected={selected_type == t.as_str()}>{t.label()}</option>
                        })}
                    </select>
                    <FieldError message={error_for("type")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Price (HUF)"}</span></label>
                    <input type="number" name="price" min="0" step="1" class="input input-bordered"
                        value={value(|l| l.price.normalize().to_string())} />
                    <FieldError message={error_for("price")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Area (m²)"}</span></label>
                    <input type="number" name="area" min="0" step="0.01" class="input input-bordered"
                        value={value(|l| l.area.normalize().to_string())} />
                    <FieldError message={error_for("area")} />
                </div>
                <div class="grid grid-cols-2 gap-4">
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Bedrooms"}</span></label>
                        <input type="number" name="bedrooms" min="0" class="input input-bordered"
                            value={value(|l| opt_text(&l.bedrooms))} />
                        <FieldError message={error_for("bedrooms")} />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Bathrooms"}</span></label>
                        <input type="number" name="bathrooms" min="0" class="input input-bordered"
                            value={value(|l| opt_text(&l.bathrooms))} />
                        <FieldError message={error_for("bathrooms")} />
                    </div>
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Address"}</span></label>
                    <input type="text" name="address" class="input input-bordered"
                        value={value(|l| l.address.clone())} />
                    <FieldError message={error_for("address")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"City"}</span></label>
                    <input type="text" name="city" class="input input-bordered"
                        value={value(|l| l.city.clone())} />
                    <FieldError message={error_for("city")} />
                </div>
                <div class="grid grid-cols-2 gap-4">
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Latitude"}</span></label>
                        <input type="text" name="lat" inputmode="decimal" class="input input-bordered"
                            value={value(|l| opt_text(&l.lat))} />
                        <FieldError message={error_for("lat")} />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{"Longitude"}</span></label>
                        <input type="text" name="lng" inputmode="decimal" class="input input-bordered"
                            value={value(|l| opt_text(&l.lng))} />
                        <FieldError message={error_for("lng")} />
                    </div>
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Contact phone"}</span></label>
                    <input type="tel" name="phoneNumber" placeholder="+36301234567" class="input input-bordered"
                        value={value(|l| opt_text(&l.phone_number))} />
                    <FieldError message={error_for("phoneNumber")} />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{"Contact email"}</span></label>
                    <input type="email" name="email" class="input input-bordered"
                        value={value(|l| opt_text(&l.email))} />
                    <FieldError message={error_for("email")} />
                </div>
                <div class="form-control md:col-span-2">
                    <label class="label">
                        <span class="label-text">{"Images"}</span>
                        <span class="label-text-alt">{format!("at most {} in total", MAX_LISTING_IMAGES)}</span>
                    </label>
                    <input type="file" accept="image/*" multiple={true}
                        class="file-input file-input-bordered" onchange={on_files} />
                    if !uploads.0.is_empty() {
                        <div class="flex flex-wrap gap-2 mt-2">
                            {for uploads.0.iter().enumerate().map(|(i, src)| {
                                let uploads = uploads.clone();
                                html! {
                                    <div class="relative">
                                        <img src={src.clone()} class="h-20 w-28 object-cover rounded" />
                                        <button type="button" class="btn btn-xs btn-circle btn-error absolute -top-2 -right-2"
                                            title="Remove"
                                            onclick={Callback::from(move |_| uploads.dispatch(UploadAction::Remove(i)))}>
                                            <i class="fas fa-times"></i>
                                        </button>
                                    </div>
                                }
                            })}
                        </div>
                    }
                    <label class="label"><span class="label-text">{"Or image URLs, one per line"}</span></label>
                    <textarea name="images" class="textarea textarea-bordered font-mono text-sm" rows="3"
                        value={initial_urls.join("\n")} />
                    <FieldError message={error_for("images")} />
                </div>
                <div class="md:col-span-2 flex justify-end">
                    <button type="submit" class="btn btn-primary" disabled={props.submitting}>
                        {if props.submitting {
                            html! { <span class="loading loading-spinner loading-sm"></span> }
                        } else {
                            html! {}
                        }}
                        { &props.submit_label }
                    </button>
                </div>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn filled() -> ListingFormFields {
        ListingFormFields {
            title: "Modern Downtown Condo".to_string(),
            property_type: "condo".to_string(),
            price: "750000".to_string(),
            area: "1200".to_string(),
            bedrooms: "2".to_string(),
            address: "Kossuth Lajos utca 12".to_string(),
            city: "Nyíregyháza".to_string(),
            lat: "47.956967".to_string(),
            lng: "21.7157".to_string(),
            images: "a.jpg\n\n  b.jpg  \n".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filled_form_builds_request() {
        let request = filled().to_request().unwrap();
        assert_eq!(request.title.as_deref(), Some("Modern Downtown Condo"));
        assert_eq!(request.property_type, Some(PropertyType::Condo));
        assert_eq!(request.price, Some(Decimal::new(750_000, 0)));
        assert_eq!(request.bedrooms, Some(2));
        assert_eq!(request.bathrooms, None);
        assert_eq!(request.lat, Some(47.956967));
        assert_eq!(request.images, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
        assert_eq!(request.description, None);
    }

    #[test]
    fn test_image_cap_is_checked_before_sending() {
        let mut fields = filled();
        fields.images = (0..=MAX_LISTING_IMAGES).map(|i| format!("{i}.jpg\n")).collect();
        let errors = fields.to_request().unwrap_err();
        assert!(errors.contains_key("images"));
    }

    #[test]
    fn test_uploads_follow_typed_urls_and_count_towards_cap() {
        let mut fields = filled();
        fields.uploads = vec!["data:image/png;base64,AAAA".to_string()];
        let request = fields.to_request().unwrap();
        assert_eq!(
            request.images,
            vec!["a.jpg".to_string(), "b.jpg".to_string(), "data:image/png;base64,AAAA".to_string()]
        );

        fields.uploads = vec!["data:image/png;base64,AAAA".to_string(); MAX_LISTING_IMAGES - 1];
        assert!(fields.to_request().unwrap_err().contains_key("images"));
    }

    #[test]
    fn test_split_images_separates_uploads() {
        let images = vec![
            "https://images.example.com/front.jpg".to_string(),
            "data:image/jpeg;base64,/9j/".to_string(),
        ];
        let (urls, uploads) = split_images(&images);
        assert_eq!(urls, vec!["https://images.example.com/front.jpg".to_string()]);
        assert_eq!(uploads, vec!["data:image/jpeg;base64,/9j/".to_string()]);
    }

    #[test]
    fn test_upload_reducer_caps_and_removes() {
        let mut state = Rc::new(UploadedImages::default());
        for i in 0..=MAX_LISTING_IMAGES {
            state = state.reduce(UploadAction::Add(format!("data:{i}")));
        }
        assert_eq!(state.0.len(), MAX_LISTING_IMAGES);

        state = state.reduce(UploadAction::Remove(0));
        assert_eq!(state.0.first().map(String::as_str), Some("data:1"));
        state = state.reduce(UploadAction::Remove(99));
        assert_eq!(state.0.len(), MAX_LISTING_IMAGES - 1);
    }

    #[test]
    fn test_unparsable_numbers_are_field_errors() {
        let mut fields = filled();
        fields.price = "a lot".to_string();
        fields.bedrooms = "2.5".to_string();
        let errors = fields.to_request().unwrap_err();
        assert!(errors.contains_key("price"));
        assert!(errors.contains_key("bedrooms"));
    }
}
