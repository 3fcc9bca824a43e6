//! The bidirectional sync controller.
//!
//! Owns two linked display-amount fields. An edit to either side
//! recomputes the other through the explicit conversion pipeline; the
//! recompute only ever flows away from the edited field, which is what
//! prevents oscillation.

use flipinput_common::{decimal, CurrencyInfo};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::convert;
use crate::error::{FlipError, FlipResult};
use crate::precision::{
    max_conversion_decimals, precision_adjust, truncate_decimals, PrecisionAdjustParams,
};
use crate::rates::RateSource;
use crate::ratio::{display_flip_ratio, display_to_exchange_ratio, DECIMAL_PRECISION};
use crate::validate::is_valid_input;

/// Which field the last accepted keystroke touched. Exactly one side is
/// authoritative per update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditedField {
    /// The primary (crypto) field.
    Primary,
    /// The secondary (fiat) field.
    Secondary,
}

/// The two linked display amounts owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPair {
    /// Amount in the primary display denomination.
    pub primary_amount: String,
    /// Amount in the secondary display denomination.
    pub secondary_amount: String,
}

/// Notification payload produced by every accepted edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountSnapshot {
    /// Primary field contents, in its display denomination.
    pub primary_amount: String,
    /// Secondary field contents, in its display denomination. Empty when
    /// no conversion was available.
    pub secondary_amount: String,
    /// Primary side in native units. Empty when no conversion was
    /// available.
    pub native_amount: String,
    /// Primary side in its exchange denomination. Empty when no
    /// conversion was available.
    pub exchange_amount: String,
    /// Which field the user edited.
    pub field_changed: EditedField,
}

impl AmountSnapshot {
    fn blank(field_changed: EditedField) -> Self {
        Self {
            primary_amount: String::new(),
            secondary_amount: String::new(),
            native_amount: String::new(),
            exchange_amount: String::new(),
            field_changed,
        }
    }
}

/// Callback invoked with every accepted edit.
pub type AmountObserver = Box<dyn FnMut(&AmountSnapshot)>;

/// Bidirectional amount input controller.
///
/// Built from the two sides' denomination info and an optional
/// secondary-per-primary price (in exchange units). Without a price the
/// controller still accepts edits on the primary side; the derived field
/// stays blank until [`FlipController::set_price`] supplies one.
pub struct FlipController {
    primary: CurrencyInfo,
    secondary: CurrencyInfo,
    /// Secondary exchange units per one primary exchange unit.
    price: Option<String>,
    primary_display_ratio: String,
    secondary_display_ratio: String,
    primary_entry_decimals: u32,
    secondary_entry_decimals: u32,
    /// Entry precision minus the precision adjustment at the current
    /// price. Applied to secondary→primary conversion results.
    primary_conversion_decimals: u32,
    primary_amount: String,
    secondary_amount: String,
    last_edited: EditedField,
    observer: Option<AmountObserver>,
}

impl FlipController {
    /// Create a controller with an optional injected price ratio. A zero
    /// price is treated as unavailable rather than converted against.
    pub fn new(
        primary: CurrencyInfo,
        secondary: CurrencyInfo,
        price: Option<String>,
    ) -> FlipResult<Self> {
        let price = price.filter(|p| !decimal::is_zero_string(p));
        let primary_display_ratio = display_to_exchange_ratio(&primary)?;
        let secondary_display_ratio = display_to_exchange_ratio(&secondary)?;
        let primary_entry_decimals = primary.display_denomination.multiplier.decimals();
        let secondary_entry_decimals = secondary.display_denomination.multiplier.decimals();
        let primary_conversion_decimals =
            Self::conversion_decimals(&primary, &secondary, price.as_deref(), primary_entry_decimals);
        Ok(Self {
            primary,
            secondary,
            price,
            primary_display_ratio,
            secondary_display_ratio,
            primary_entry_decimals,
            secondary_entry_decimals,
            primary_conversion_decimals,
            primary_amount: String::new(),
            secondary_amount: String::new(),
            last_edited: EditedField::Primary,
            observer: None,
        })
    }

    /// Create a controller that looks its price up once through a
    /// [`RateSource`]. A missing quote leaves the controller priceless,
    /// not broken.
    pub fn from_rate_source(
        primary: CurrencyInfo,
        secondary: CurrencyInfo,
        source: &dyn RateSource,
    ) -> FlipResult<Self> {
        let price = source
            .price(&primary.currency_code, &secondary.currency_code)
            .map(|quote| quote.rate);
        if price.is_none() {
            debug!(
                base = %primary.currency_code,
                quote = %secondary.currency_code,
                "No quote available at construction"
            );
        }
        Self::new(primary, secondary, price)
    }

    /// Seed the fields from an initial native amount.
    pub fn with_native_amount(mut self, native_amount: &str) -> FlipResult<Self> {
        self.set_from_native_amount(native_amount)?;
        Ok(self)
    }

    /// Register the observer invoked with every accepted edit.
    pub fn set_observer(&mut self, observer: impl FnMut(&AmountSnapshot) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// The current field contents.
    pub fn amounts(&self) -> AmountPair {
        AmountPair {
            primary_amount: self.primary_amount.clone(),
            secondary_amount: self.secondary_amount.clone(),
        }
    }

    /// Which field the last accepted edit touched.
    pub fn last_edited(&self) -> EditedField {
        self.last_edited
    }

    /// The current price ratio, if one is available.
    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    /// The price re-expressed in display units of both sides, the figure
    /// a host renders next to the fields (e.g. USD per mBTC rather than
    /// USD per BTC). `None` when no price is available or the ratio
    /// cannot be derived.
    pub fn display_price(&self) -> Option<String> {
        let price = self.price.as_deref()?;
        display_flip_ratio(&self.primary, &self.secondary, price).ok()
    }

    /// Maximum decimals the primary field accepts while typing.
    pub fn primary_entry_decimals(&self) -> u32 {
        self.primary_entry_decimals
    }

    /// Maximum decimals the secondary field accepts while typing.
    pub fn secondary_entry_decimals(&self) -> u32 {
        self.secondary_entry_decimals
    }

    /// Effective primary precision for secondary→primary conversions at
    /// the current price.
    pub fn primary_conversion_decimals(&self) -> u32 {
        self.primary_conversion_decimals
    }

    /// Replace the price ratio (e.g. after a refresh). Zero is treated as
    /// unavailable. The precision adjustment is recomputed.
    pub fn set_price(&mut self, price: Option<String>) {
        let price = price.filter(|p| !decimal::is_zero_string(p));
        self.primary_conversion_decimals = Self::conversion_decimals(
            &self.primary,
            &self.secondary,
            price.as_deref(),
            self.primary_entry_decimals,
        );
        debug!(
            available = price.is_some(),
            conversion_decimals = self.primary_conversion_decimals,
            "Price updated"
        );
        self.price = price;
    }

    /// A validated keystroke landed in the primary field: recompute the
    /// secondary field from it.
    pub fn on_primary_amount_change(&mut self, input: &str) -> FlipResult<AmountSnapshot> {
        if !is_valid_input(input) {
            debug!(input, "Rejected primary keystroke");
            return Err(FlipError::InvalidInput(input.to_string()));
        }
        if input.is_empty() {
            return Ok(self.apply(AmountSnapshot::blank(EditedField::Primary)));
        }
        let amount = truncate_decimals(input, self.primary_entry_decimals);
        if amount.is_empty() {
            return Ok(self.apply(AmountSnapshot::blank(EditedField::Primary)));
        }
        let snapshot = match self.derive_from_primary(&amount) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "Primary conversion failed; blanking derived field");
                AmountSnapshot {
                    primary_amount: amount,
                    ..AmountSnapshot::blank(EditedField::Primary)
                }
            }
        };
        Ok(self.apply(snapshot))
    }

    /// A validated keystroke landed in the secondary field: recompute the
    /// primary field from it, at the precision-adjusted number of
    /// decimals.
    pub fn on_secondary_amount_change(&mut self, input: &str) -> FlipResult<AmountSnapshot> {
        if !is_valid_input(input) {
            debug!(input, "Rejected secondary keystroke");
            return Err(FlipError::InvalidInput(input.to_string()));
        }
        if input.is_empty() {
            return Ok(self.apply(AmountSnapshot::blank(EditedField::Secondary)));
        }
        let amount = truncate_decimals(input, self.secondary_entry_decimals);
        if amount.is_empty() {
            return Ok(self.apply(AmountSnapshot::blank(EditedField::Secondary)));
        }
        let snapshot = match self.derive_from_secondary(&amount) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "Secondary conversion failed; blanking derived field");
                AmountSnapshot {
                    secondary_amount: amount,
                    ..AmountSnapshot::blank(EditedField::Secondary)
                }
            }
        };
        Ok(self.apply(snapshot))
    }

    /// The underlying native amount changed out-of-band (a "max" button,
    /// an external wallet event): re-derive the primary display amount
    /// and funnel it through the primary change path exactly once.
    pub fn set_from_native_amount(&mut self, native_amount: &str) -> FlipResult<AmountSnapshot> {
        if native_amount.is_empty() {
            return self.on_primary_amount_change("");
        }
        let to_display =
            convert::native_to_display(self.primary.display_denomination.multiplier.as_str())?;
        let display = to_display(native_amount)?;
        self.on_primary_amount_change(&display)
    }

    fn derive_from_primary(&self, display: &str) -> FlipResult<AmountSnapshot> {
        let to_native =
            convert::display_to_native(self.primary.display_denomination.multiplier.as_str())?;
        let native = to_native(display)?;
        let to_exchange =
            convert::native_to_display(self.primary.exchange_denomination.multiplier.as_str())?;
        let exchange = to_exchange(&native)?;

        let secondary_amount = match self.price.as_deref() {
            Some(price) => {
                let across = convert::exchange_to_exchange(price)?;
                let to_secondary_display =
                    convert::exchange_to_display(&self.secondary_display_ratio)?;
                let secondary_exchange = across(&exchange)?;
                let secondary_display = to_secondary_display(&secondary_exchange)?;
                truncate_decimals(&secondary_display, self.secondary_entry_decimals)
            }
            None => {
                debug!("Price unavailable; leaving secondary field blank");
                String::new()
            }
        };

        Ok(AmountSnapshot {
            primary_amount: display.to_string(),
            secondary_amount,
            native_amount: native,
            exchange_amount: exchange,
            field_changed: EditedField::Primary,
        })
    }

    fn derive_from_secondary(&self, display: &str) -> FlipResult<AmountSnapshot> {
        let price = self.price.as_deref().ok_or_else(|| self.ratio_unavailable())?;

        let to_secondary_exchange = convert::display_to_exchange(&self.secondary_display_ratio)?;
        let secondary_exchange = to_secondary_exchange(display)?;
        // The price is secondary units per primary unit, so crossing back
        // divides.
        let primary_exchange = decimal::div(&secondary_exchange, price, DECIMAL_PRECISION)?;
        let to_primary_display = convert::exchange_to_display(&self.primary_display_ratio)?;
        let primary_long = to_primary_display(&primary_exchange)?;
        let primary_amount = truncate_decimals(&primary_long, self.primary_conversion_decimals);

        // Reconvert after clamping so the native and exchange amounts
        // match what the field shows.
        let to_native =
            convert::display_to_native(self.primary.display_denomination.multiplier.as_str())?;
        let native = to_native(&primary_amount)?;
        let to_exchange =
            convert::native_to_display(self.primary.exchange_denomination.multiplier.as_str())?;
        let exchange = to_exchange(&native)?;

        Ok(AmountSnapshot {
            primary_amount,
            secondary_amount: display.to_string(),
            native_amount: native,
            exchange_amount: exchange,
            field_changed: EditedField::Secondary,
        })
    }

    fn apply(&mut self, snapshot: AmountSnapshot) -> AmountSnapshot {
        self.primary_amount = snapshot.primary_amount.clone();
        self.secondary_amount = snapshot.secondary_amount.clone();
        self.last_edited = snapshot.field_changed;
        if let Some(observer) = self.observer.as_mut() {
            observer(&snapshot);
        }
        snapshot
    }

    fn ratio_unavailable(&self) -> FlipError {
        FlipError::RatioUnavailable {
            base: self.primary.currency_code.clone(),
            quote: self.secondary.currency_code.clone(),
        }
    }

    fn conversion_decimals(
        primary: &CurrencyInfo,
        secondary: &CurrencyInfo,
        price: Option<&str>,
        entry_decimals: u32,
    ) -> u32 {
        match price {
            Some(price) => max_conversion_decimals(
                entry_decimals,
                precision_adjust(&PrecisionAdjustParams {
                    exchange_secondary_to_primary_ratio: price,
                    secondary_exchange_multiplier: secondary
                        .exchange_denomination
                        .multiplier
                        .as_str(),
                    primary_exchange_multiplier: primary.exchange_denomination.multiplier.as_str(),
                }),
            ),
            None => entry_decimals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipinput_common::{Denomination, Multiplier};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn btc() -> CurrencyInfo {
        CurrencyInfo::uniform(
            "BTC",
            Denomination::new("BTC", Multiplier::new("100000000").unwrap()).with_symbol("₿"),
        )
    }

    fn btc_in_mbtc() -> CurrencyInfo {
        CurrencyInfo::new(
            "BTC",
            Denomination::new("mBTC", Multiplier::new("100000").unwrap()).with_symbol("m₿"),
            Denomination::new("BTC", Multiplier::new("100000000").unwrap()).with_symbol("₿"),
        )
    }

    fn usd() -> CurrencyInfo {
        CurrencyInfo::uniform(
            "iso:USD",
            Denomination::new("USD", Multiplier::new("100").unwrap()).with_symbol("$"),
        )
    }

    fn controller_at(price: &str) -> FlipController {
        FlipController::new(btc(), usd(), Some(price.to_string())).unwrap()
    }

    #[test]
    fn primary_edit_derives_secondary() {
        let mut flip = controller_at("10000");
        let snapshot = flip.on_primary_amount_change("1").unwrap();

        assert_eq!(snapshot.primary_amount, "1");
        assert_eq!(snapshot.secondary_amount, "10000");
        assert_eq!(snapshot.native_amount, "100000000");
        assert_eq!(snapshot.exchange_amount, "1");
        assert_eq!(snapshot.field_changed, EditedField::Primary);
        assert_eq!(flip.last_edited(), EditedField::Primary);
    }

    #[test]
    fn secondary_edit_derives_primary() {
        let mut flip = controller_at("10000");
        let snapshot = flip.on_secondary_amount_change("123.45").unwrap();

        assert_eq!(snapshot.primary_amount, "0.012345");
        assert_eq!(snapshot.secondary_amount, "123.45");
        assert_eq!(snapshot.native_amount, "1234500");
        assert_eq!(snapshot.field_changed, EditedField::Secondary);
        assert_eq!(flip.last_edited(), EditedField::Secondary);
    }

    #[test]
    fn sub_unit_display_denomination() {
        let mut flip =
            FlipController::new(btc_in_mbtc(), usd(), Some("10000".to_string())).unwrap();

        // 1000 mBTC is one whole BTC
        let snapshot = flip.on_primary_amount_change("1000").unwrap();
        assert_eq!(snapshot.native_amount, "100000000");
        assert_eq!(snapshot.exchange_amount, "1");
        assert_eq!(snapshot.secondary_amount, "10000");

        let snapshot = flip.on_secondary_amount_change("10000").unwrap();
        assert_eq!(snapshot.primary_amount, "1000");
        assert_eq!(snapshot.native_amount, "100000000");
    }

    #[test]
    fn keystrokes_are_truncated_to_entry_precision() {
        let mut flip = controller_at("10000");
        // USD entry allows two decimals
        let snapshot = flip.on_secondary_amount_change("10.999").unwrap();
        assert_eq!(snapshot.secondary_amount, "10.99");
    }

    #[test]
    fn empty_input_blanks_both_fields() {
        let mut flip = controller_at("10000");
        flip.on_primary_amount_change("1").unwrap();

        let snapshot = flip.on_primary_amount_change("").unwrap();
        assert_eq!(snapshot.primary_amount, "");
        assert_eq!(snapshot.secondary_amount, "");
        assert_eq!(flip.amounts().secondary_amount, "");
    }

    #[test]
    fn invalid_keystroke_leaves_state_untouched() {
        let mut flip = controller_at("10000");
        flip.on_primary_amount_change("1").unwrap();
        let before = flip.amounts();

        let err = flip.on_primary_amount_change("1q").unwrap_err();
        assert!(matches!(err, FlipError::InvalidInput(_)));
        assert_eq!(flip.amounts(), before);
        assert_eq!(flip.last_edited(), EditedField::Primary);
    }

    #[test]
    fn missing_price_blanks_only_the_derived_field() {
        let mut flip = FlipController::new(btc(), usd(), None).unwrap();

        let snapshot = flip.on_primary_amount_change("2").unwrap();
        assert_eq!(snapshot.primary_amount, "2");
        assert_eq!(snapshot.secondary_amount, "");
        // The native side is still derivable without a price
        assert_eq!(snapshot.native_amount, "200000000");

        let snapshot = flip.on_secondary_amount_change("50").unwrap();
        assert_eq!(snapshot.secondary_amount, "50");
        assert_eq!(snapshot.primary_amount, "");
        assert_eq!(snapshot.native_amount, "");
    }

    #[test]
    fn display_price_follows_the_display_denomination() {
        let flip = FlipController::new(btc_in_mbtc(), usd(), Some("10000".to_string())).unwrap();
        // $10000 per BTC is $10 per mBTC
        assert_eq!(flip.display_price().as_deref(), Some("10"));

        let unpriced = FlipController::new(btc(), usd(), None).unwrap();
        assert_eq!(unpriced.display_price(), None);
    }

    #[test]
    fn zero_price_counts_as_unavailable() {
        let flip = FlipController::new(btc(), usd(), Some("0".to_string())).unwrap();
        assert_eq!(flip.price(), None);
    }

    #[test]
    fn price_refresh_restores_conversion() {
        let mut flip = FlipController::new(btc(), usd(), None).unwrap();
        flip.on_secondary_amount_change("50").unwrap();
        assert_eq!(flip.amounts().primary_amount, "");

        flip.set_price(Some("10000".to_string()));
        let snapshot = flip.on_secondary_amount_change("50").unwrap();
        assert_eq!(snapshot.primary_amount, "0.005");
    }

    #[test]
    fn set_from_native_funnels_through_primary_path() {
        let mut flip = controller_at("10000");
        let snapshot = flip.set_from_native_amount("150000000").unwrap();

        assert_eq!(snapshot.primary_amount, "1.5");
        assert_eq!(snapshot.secondary_amount, "15000");
        assert_eq!(snapshot.field_changed, EditedField::Primary);
    }

    #[test]
    fn with_native_amount_seeds_initial_state() {
        let flip = controller_at("10000")
            .with_native_amount("100000000")
            .unwrap();
        assert_eq!(flip.amounts().primary_amount, "1");
        assert_eq!(flip.amounts().secondary_amount, "10000");
    }

    #[test]
    fn observer_sees_every_accepted_edit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut flip = controller_at("10000");
        flip.set_observer(move |snapshot: &AmountSnapshot| {
            sink.borrow_mut().push(snapshot.clone());
        });

        flip.on_primary_amount_change("1").unwrap();
        flip.on_primary_amount_change("1q").unwrap_err();
        flip.on_secondary_amount_change("25").unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].field_changed, EditedField::Primary);
        assert_eq!(seen[1].field_changed, EditedField::Secondary);
    }

    #[test]
    fn lone_separator_converts_as_zero() {
        let mut flip = controller_at("10000");
        let snapshot = flip.on_primary_amount_change(".").unwrap();
        assert_eq!(snapshot.primary_amount, ".");
        assert_eq!(snapshot.secondary_amount, "0");
    }

    #[test]
    fn from_rate_source_picks_up_quote() {
        use crate::rates::RateTable;

        let table = RateTable::new();
        table.insert("BTC", "iso:USD", "10000");

        let mut flip = FlipController::from_rate_source(btc(), usd(), &table).unwrap();
        let snapshot = flip.on_primary_amount_change("1").unwrap();
        assert_eq!(snapshot.secondary_amount, "10000");

        let no_quote = FlipController::from_rate_source(usd(), btc(), &table).unwrap();
        assert_eq!(no_quote.price(), None);
    }
}
