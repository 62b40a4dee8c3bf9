//! Common transport-layer types shared between backend and frontend.
//! These structs mirror the backend handlers' request/response payloads
//! so the frontend can deserialize API responses without duplicating shapes.

pub mod filter;
pub mod markers;
pub mod price;
mod property_type;
pub mod validation;

pub use filter::{FilterCriteria, filter_listings};
pub use markers::{MapMarker, map_markers};
pub use property_type::{PropertyType, PropertyTypeFilter};
pub use validation::{FieldErrors, MAX_LISTING_IMAGES, MIN_PASSWORD_LENGTH, PHONE_NUMBER_RE};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use validation::{field_error, push_field_error, to_field_errors};

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    /// Human readable error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Per-field messages for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FieldErrors>,
    /// Always false
    pub success: bool,
}

// ===================== Users =====================

/// Public user record. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "The name field is required and may not exceed 255 characters."))]
    pub name: String,
    #[serde(default)]
    #[validate(
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field may not exceed 255 characters.")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "The password field must be at least 8 characters."))]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl RegisterRequest {
    pub fn validate_registration(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => to_field_errors(&e),
        };
        if self.password != self.password_confirmation {
            push_field_error(
                &mut errors,
                "password",
                "The password field confirmation does not match.",
            );
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LoginResponse {
    /// Bearer token; shown only once
    pub token: String,
    pub user: UserDto,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "The name field may not be empty or exceed 255 characters."))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field may not exceed 255 characters.")
    )]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "The password field must be at least 8 characters."))]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
}

impl UpdateProfileRequest {
    /// Field rules plus the password-change preconditions that can be checked
    /// without the stored hash. Verifying `current_password` is left to the
    /// account service.
    pub fn validate_profile(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => to_field_errors(&e),
        };

        if let Some(password) = &self.password {
            if self.password_confirmation.as_deref() != Some(password.as_str()) {
                push_field_error(
                    &mut errors,
                    "password",
                    "The password field confirmation does not match.",
                );
            }
            if self.current_password.as_deref().is_none_or(str::is_empty) {
                push_field_error(
                    &mut errors,
                    "current_password",
                    "The current password is required to set a new password.",
                );
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: UserDto,
}

// ===================== Listings =====================

/// Listing as returned by the API. Prices are raw currency units.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ListingDto {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[schema(value_type = String, example = "750000.00")]
    pub price: Decimal,
    #[schema(value_type = String, example = "1200.00")]
    pub area: Decimal,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub address: String,
    pub city: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of listing create and update. Update is a full replacement, so the
/// same rules apply to both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct ListingRequest {
    #[validate(
        required(message = "The title field is required."),
        length(min = 1, max = 255, message = "The title field is required and may not exceed 255 characters.")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[validate(required(message = "The type field is required."))]
    pub property_type: Option<PropertyType>,
    #[schema(value_type = Option<String>, example = "750000")]
    #[validate(required(message = "The price field is required."))]
    pub price: Option<Decimal>,
    #[schema(value_type = Option<String>, example = "1200")]
    #[validate(required(message = "The area field is required."))]
    pub area: Option<Decimal>,
    #[validate(range(min = 0, message = "The bedrooms field must be at least 0."))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, message = "The bathrooms field must be at least 0."))]
    pub bathrooms: Option<i32>,
    #[validate(
        required(message = "The address field is required."),
        length(min = 1, max = 255, message = "The address field is required and may not exceed 255 characters.")
    )]
    pub address: Option<String>,
    #[validate(
        required(message = "The city field is required."),
        length(min = 1, max = 255, message = "The city field is required and may not exceed 255 characters.")
    )]
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "The lat field must be between -90 and 90."))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "The lng field must be between -180 and 180."))]
    pub lng: Option<f64>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[validate(
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field may not exceed 255 characters.")
    )]
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ListingRequest {
    /// Runs the derived field rules and the cross-field rules (price and area
    /// floors, coordinate pairing, phone pattern, image cap).
    pub fn validate_listing(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if self.price.is_some_and(|p| p < Decimal::ZERO) {
            errors.add("price", field_error("min", "The price field must be at least 0."));
        }
        if self.area.is_some_and(|a| a <= Decimal::ZERO) {
            errors.add("area", field_error("min", "The area field must be greater than 0."));
        }
        match (self.lat, self.lng) {
            (Some(_), None) => errors.add(
                "lng",
                field_error("pair", "The lng field is required when lat is present."),
            ),
            (None, Some(_)) => errors.add(
                "lat",
                field_error("pair", "The lat field is required when lng is present."),
            ),
            _ => {}
        }
        if let Some(phone) = &self.phone_number {
            if !PHONE_NUMBER_RE.is_match(phone) {
                errors.add(
                    "phoneNumber",
                    field_error(
                        "regex",
                        "The phone number must contain 10 to 15 digits with an optional leading +.",
                    ),
                );
            }
        }
        if self.images.len() > MAX_LISTING_IMAGES {
            errors.add(
                "images",
                field_error("max", "A listing may not have more than 10 images."),
            );
        }
        if self.images.iter().any(|i| i.trim().is_empty()) {
            errors.add(
                "images",
                field_error("empty", "Image references may not be empty."),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(to_field_errors(&errors))
        }
    }
}

impl From<&ListingDto> for ListingRequest {
    fn from(listing: &ListingDto) -> Self {
        Self {
            title: Some(listing.title.clone()),
            description: listing.description.clone(),
            property_type: Some(listing.property_type),
            price: Some(listing.price),
            area: Some(listing.area),
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            address: Some(listing.address.clone()),
            city: Some(listing.city.clone()),
            lat: listing.lat,
            lng: listing.lng,
            phone_number: listing.phone_number.clone(),
            email: listing.email.clone(),
            images: listing.images.clone(),
        }
    }
}

// ===================== Likes =====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ToggleLikeResponse {
    /// "Listing liked" or "Listing unliked"
    pub message: String,
    pub listing_id: i32,
    /// Membership after the toggle
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LikesCountResponse {
    pub listing_id: i32,
    pub likes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_listing() -> ListingRequest {
        ListingRequest {
            title: Some("Modern Downtown Condo".into()),
            property_type: Some(PropertyType::Condo),
            price: Some(Decimal::new(750_000, 0)),
            area: Some(Decimal::new(1200, 0)),
            bedrooms: Some(2),
            address: Some("Fő utca 1".into()),
            city: Some("Nyíregyháza".into()),
            lat: Some(47.956967),
            lng: Some(21.7157),
            phone_number: Some("+36301234567".into()),
            email: Some("owner@example.com".into()),
            images: vec!["https://img.example.com/1.jpg".into()],
            ..Default::default()
        }
    }

    #[test]
    fn valid_listing_passes() {
        assert!(valid_listing().validate_listing().is_ok());
    }

    #[test]
    fn missing_required_fields_are_reported_per_field() {
        let errors = ListingRequest::default().validate_listing().unwrap_err();
        for field in ["title", "price", "area", "address", "city"] {
            assert!(errors.contains_key(field), "missing error for {field}: {errors:?}");
        }
        assert!(errors.contains_key("type") || errors.contains_key("property_type"));
    }

    #[test]
    fn rejects_negative_price_and_non_positive_area() {
        let mut req = valid_listing();
        req.price = Some(Decimal::new(-1, 0));
        req.area = Some(Decimal::ZERO);
        let errors = req.validate_listing().unwrap_err();
        assert!(errors.contains_key("price"));
        assert!(errors.contains_key("area"));

        let mut req = valid_listing();
        req.price = Some(Decimal::ZERO);
        assert!(req.validate_listing().is_ok());
    }

    #[test]
    fn coordinates_come_in_pairs() {
        let mut req = valid_listing();
        req.lng = None;
        assert!(req.validate_listing().unwrap_err().contains_key("lng"));

        let mut req = valid_listing();
        req.lat = Some(91.0);
        assert!(req.validate_listing().unwrap_err().contains_key("lat"));
    }

    #[test]
    fn image_cap_and_phone_pattern() {
        let mut req = valid_listing();
        req.images = (0..11).map(|i| format!("img-{i}.jpg")).collect();
        req.phone_number = Some("12-34".into());
        let errors = req.validate_listing().unwrap_err();
        assert!(errors.contains_key("images"));
        assert!(errors.contains_key("phoneNumber"));

        let mut req = valid_listing();
        req.images = (0..10).map(|i| format!("img-{i}.jpg")).collect();
        assert!(req.validate_listing().is_ok());
    }

    #[test]
    fn listing_request_uses_wire_names() {
        let json = serde_json::json!({
            "title": "Studio",
            "type": "Studio",
            "price": "99000",
            "area": 30,
            "address": "Kossuth tér 2",
            "city": "Debrecen",
            "phoneNumber": "+36301234567"
        });
        let req: ListingRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.property_type, Some(PropertyType::Studio));
        assert_eq!(req.price, Some(Decimal::new(99_000, 0)));
        assert_eq!(req.area, Some(Decimal::new(30, 0)));
        assert!(req.images.is_empty());
        assert!(req.validate_listing().is_ok());
    }

    #[test]
    fn register_rules() {
        let ok = RegisterRequest {
            name: "Anna".into(),
            email: "anna@example.com".into(),
            password: "correct horse".into(),
            password_confirmation: "correct horse".into(),
        };
        assert!(ok.validate_registration().is_ok());

        let bad = RegisterRequest {
            name: String::new(),
            email: "not-an-email".into(),
            password: "short".into(),
            password_confirmation: "other".into(),
        };
        let errors = bad.validate_registration().unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert_eq!(errors["password"].len(), 2);
    }

    #[test]
    fn password_change_needs_confirmation_and_current_password() {
        let req = UpdateProfileRequest {
            password: Some("new password".into()),
            password_confirmation: Some("different".into()),
            ..Default::default()
        };
        let errors = req.validate_profile().unwrap_err();
        assert!(errors.contains_key("password"));
        assert!(errors.contains_key("current_password"));

        let name_only = UpdateProfileRequest {
            name: Some("New Name".into()),
            ..Default::default()
        };
        assert!(name_only.validate_profile().is_ok());
    }
}
