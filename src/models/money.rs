// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Storefront money formatting.
//!
//! Formats follow the storefront's `money_format` setting: a template such as
//! `"${{amount}}"` or `"{{amount_with_comma_separator}} €"` where the
//! placeholder selects precision and separators.

/// Default template used when the storefront does not provide one
pub const DEFAULT_MONEY_FORMAT: &str = "${{amount}}";

/// Number style selected by a template placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountStyle {
    /// 1,234.56
    Amount,
    /// 1,235
    NoDecimals,
    /// 1.234,56
    CommaSeparator,
    /// 1.235
    NoDecimalsCommaSeparator,
    /// 1'234.56
    ApostropheSeparator,
}

impl AmountStyle {
    fn from_placeholder(name: &str) -> Self {
        match name.trim() {
            "amount_no_decimals" => AmountStyle::NoDecimals,
            "amount_with_comma_separator" => AmountStyle::CommaSeparator,
            "amount_no_decimals_with_comma_separator" => AmountStyle::NoDecimalsCommaSeparator,
            "amount_with_apostrophe_separator" => AmountStyle::ApostropheSeparator,
            _ => AmountStyle::Amount,
        }
    }

    /// (decimal places, thousands separator, decimal separator)
    fn layout(&self) -> (u32, char, char) {
        match self {
            AmountStyle::Amount => (2, ',', '.'),
            AmountStyle::NoDecimals => (0, ',', '.'),
            AmountStyle::CommaSeparator => (2, '.', ','),
            AmountStyle::NoDecimalsCommaSeparator => (0, '.', ','),
            AmountStyle::ApostropheSeparator => (2, '\'', '.'),
        }
    }
}

/// Format an amount given in minor currency units with a storefront money template.
///
/// The first `{{ ... }}` placeholder is replaced; a template without one gets
/// the amount appended.
pub fn format_money(minor_units: i64, template: &str) -> String {
    let Some(start) = template.find("{{") else {
        return format!("{}{}", template, format_amount(minor_units, AmountStyle::Amount));
    };
    let Some(len) = template[start..].find("}}") else {
        return format!("{}{}", template, format_amount(minor_units, AmountStyle::Amount));
    };
    let end = start + len;
    let style = AmountStyle::from_placeholder(&template[start + 2..end]);

    format!(
        "{}{}{}",
        &template[..start],
        format_amount(minor_units, style),
        &template[end + 2..]
    )
}

fn format_amount(minor_units: i64, style: AmountStyle) -> String {
    let (decimals, thousands, decimal_sep) = style.layout();
    let negative = minor_units < 0;
    let cents = minor_units.unsigned_abs();

    let (whole, fraction) = if decimals == 0 {
        // Round half up to whole currency units
        ((cents + 50) / 100, None)
    } else {
        (cents / 100, Some(cents % 100))
    };

    let mut out = String::new();
    if negative && (whole > 0 || fraction.is_some_and(|f| f > 0)) {
        out.push('-');
    }
    out.push_str(&group_thousands(whole, thousands));
    if let Some(fraction) = fraction {
        out.push(decimal_sep);
        out.push_str(&format!("{:02}", fraction));
    }
    out
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
