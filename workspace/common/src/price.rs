//! Price unit conversion for display.
//!
//! Prices are stored and transmitted in raw currency units (forints). The
//! browse view shows them in millions. Conversion happens only here, at the
//! display edge; filter bounds and API payloads always carry raw units.

use rust_decimal::Decimal;

/// Currency every listing price is expressed in.
pub const CURRENCY_CODE: &str = "HUF";

/// Raw units per displayed unit ("million HUF").
pub const PRICE_DISPLAY_DIVISOR: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Raw price → millions.
pub fn price_in_millions(raw: Decimal) -> Decimal {
    raw / PRICE_DISPLAY_DIVISOR
}

/// Millions (as typed into the filter panel) → raw price.
pub fn millions_to_raw(millions: Decimal) -> Decimal {
    millions * PRICE_DISPLAY_DIVISOR
}

/// `750000` → `"0.75 million HUF"`.
pub fn format_price_millions(raw: Decimal) -> String {
    format!("{:.2} million {}", price_in_millions(raw), CURRENCY_CODE)
}

/// Short marker label: `1200000` → `"1.2M"`.
pub fn format_marker_label(raw: Decimal) -> String {
    format!("{:.1}M", price_in_millions(raw))
}

pub fn format_area(area: Decimal) -> String {
    format!("{} m²", area.normalize())
}
