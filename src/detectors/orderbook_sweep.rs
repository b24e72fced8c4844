//! Order-book sweep detector
//!
//! Pure book read: imbalance between summed bid and ask size over the
//! top levels. A lopsided book suggests resting pressure about to sweep
//! the thin side.

use super::{Detector, DetectorError, DetectorParams};
use crate::domain::{DetectorFamily, Direction, MarketSnapshot, Verdict};

const NAME: &str = "orderbook_sweep";

/// Score per unit of absolute imbalance
const IMBALANCE_SCORE_SCALE: f64 = 150.0;

pub struct OrderbookSweep;

impl Detector for OrderbookSweep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn family(&self) -> DetectorFamily {
        DetectorFamily::OrderFlow
    }

    fn detect(
        &self,
        snapshot: &MarketSnapshot,
        params: &DetectorParams,
    ) -> Result<Verdict, DetectorError> {
        let book = &snapshot.order_book;
        if book.bids.is_empty() || book.asks.is_empty() {
            return Err(DetectorError::InsufficientData {
                needed: params.book_depth,
                got: book.bids.len().min(book.asks.len()),
            });
        }

        let bid_volume = book.bid_volume(params.book_depth);
        let ask_volume = book.ask_volume(params.book_depth);
        let total = bid_volume + ask_volume;
        if total <= 0.0 {
            return Ok(Verdict::neutral(NAME, DetectorFamily::OrderFlow, "book carries no size"));
        }

        let imbalance = (bid_volume - ask_volume) / total;
        if imbalance.abs() <= params.imbalance_threshold {
            return Ok(Verdict::neutral(
                NAME,
                DetectorFamily::OrderFlow,
                format!("book imbalance {imbalance:.2} within neutral band"),
            ));
        }

        let direction = if imbalance > 0.0 { Direction::Long } else { Direction::Short };
        let score = (imbalance.abs() * IMBALANCE_SCORE_SCALE).min(100.0);

        Ok(Verdict::new(
            NAME,
            DetectorFamily::OrderFlow,
            direction,
            score,
            format!(
                "top-{} book imbalance {:.2} ({:.1} bid vs {:.1} ask)",
                params.book_depth, imbalance, bid_volume, ask_volume
            ),
        )
        .with_metadata("imbalance", imbalance))
    }
}
