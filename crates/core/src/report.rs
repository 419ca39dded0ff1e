//! Shop aggregates derived from the order collection.
//!
//! Everything here is a pure function over an order snapshot. Rankings sort
//! descending by amount with a stable sort, so ties keep input order.
//! Percentages are [`Decimal`] and are never NaN or infinite: every division
//! guards its denominator.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::Order;
use crate::types::Price;

/// Accumulated quantity of one product toward its baking batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub current: u32,
    pub target: u32,
    /// `min(100, current * 100 / max(target, 1))`.
    pub percent: Decimal,
}

impl BatchProgress {
    /// Whether the batch has enough orders to bake.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

/// Progress of `product_name` toward `target_qty`.
///
/// Counts every order regardless of status.
#[must_use]
pub fn batch_progress(orders: &[Order], product_name: &str, target_qty: u32) -> BatchProgress {
    let current: u32 = orders
        .iter()
        .map(|order| order.quantity_of(product_name))
        .fold(0, u32::saturating_add);
    let percent = percent_of(Decimal::from(current), Decimal::from(target_qty.max(1)))
        .min(Decimal::ONE_HUNDRED);
    BatchProgress {
        current,
        target: target_qty,
        percent,
    }
}

/// Revenue over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRevenue {
    pub total: Price,
    pub product_revenue: Price,
    pub shipping_revenue: Price,
    pub order_count: usize,
}

/// Revenue of the orders matching `predicate`.
///
/// `product_revenue` is `total - shipping_revenue`.
pub fn period_revenue<'a, I, P>(orders: I, predicate: P) -> PeriodRevenue
where
    I: IntoIterator<Item = &'a Order>,
    P: Fn(&Order) -> bool,
{
    let mut revenue = orders
        .into_iter()
        .filter(|order| predicate(order))
        .fold(PeriodRevenue::default(), |mut acc, order| {
            acc.total += order.total_price();
            acc.shipping_revenue += order.shipping_fee();
            acc.order_count += 1;
            acc
        });
    revenue.product_revenue = revenue.total - revenue.shipping_revenue;
    revenue
}

/// Percentage change from `prior` to `current`; 0 when `prior` is 0.
#[must_use]
pub fn growth_rate(current: Price, prior: Price) -> Decimal {
    if prior.is_zero() {
        return Decimal::ZERO;
    }
    percent_of((current - prior).to_decimal(), prior.to_decimal())
}

/// A product's line in the top-products ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRanking {
    pub name: String,
    pub quantity: u32,
    pub revenue: Price,
    /// Share of the item revenue of all ranked orders.
    pub share_percent: Decimal,
}

/// Products by item revenue, highest first.
pub fn top_products<'a, I>(orders: I) -> Vec<ProductRanking>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut rankings: Vec<ProductRanking> = Vec::new();
    for item in orders.into_iter().flat_map(Order::items) {
        if let Some(entry) = rankings.iter_mut().find(|r| r.name == item.product_name) {
            entry.quantity = entry.quantity.saturating_add(item.quantity);
            entry.revenue += item.line_total();
        } else {
            rankings.push(ProductRanking {
                name: item.product_name.clone(),
                quantity: item.quantity,
                revenue: item.line_total(),
                share_percent: Decimal::ZERO,
            });
        }
    }

    let total: Price = rankings.iter().map(|r| r.revenue).sum();
    for entry in &mut rankings {
        entry.share_percent = percent_of(entry.revenue.to_decimal(), total.to_decimal());
    }
    rankings.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rankings
}

/// What to rank customers by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerSort {
    #[default]
    TotalSpent,
    OrderCount,
}

/// A customer's line in the top-customers ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRanking {
    pub name: String,
    pub total_spent: Price,
    pub order_count: usize,
    /// Share of the total of all ranked orders.
    pub share_percent: Decimal,
}

/// Customers grouped by name, ranked by `sort`, highest first.
pub fn top_customers<'a, I>(orders: I, sort: CustomerSort) -> Vec<CustomerRanking>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut rankings: Vec<CustomerRanking> = Vec::new();
    for order in orders {
        if let Some(entry) = rankings.iter_mut().find(|r| r.name == order.customer_name) {
            entry.total_spent += order.total_price();
            entry.order_count += 1;
        } else {
            rankings.push(CustomerRanking {
                name: order.customer_name.clone(),
                total_spent: order.total_price(),
                order_count: 1,
                share_percent: Decimal::ZERO,
            });
        }
    }

    let total: Price = rankings.iter().map(|r| r.total_spent).sum();
    for entry in &mut rankings {
        entry.share_percent = percent_of(entry.total_spent.to_decimal(), total.to_decimal());
    }
    match sort {
        CustomerSort::TotalSpent => rankings.sort_by(|a, b| b.total_spent.cmp(&a.total_spent)),
        CustomerSort::OrderCount => rankings.sort_by(|a, b| b.order_count.cmp(&a.order_count)),
    }
    rankings
}

/// A reporting window over order dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportPeriod {
    Month { year: i32, month: u32 },
    Year(i32),
    All,
}

impl ReportPeriod {
    /// A calendar month.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMonth` for a month outside 1-12.
    pub const fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        if month == 0 || month > 12 {
            return Err(ValidationError::InvalidMonth(month));
        }
        Ok(Self::Month { year, month })
    }

    /// Whether `date` falls in this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year(year) => date.year() == year,
            Self::All => true,
        }
    }

    /// The period immediately before this one; `None` for `All`.
    #[must_use]
    pub const fn previous(&self) -> Option<Self> {
        match *self {
            Self::Month { year, month: 1 } => Some(Self::Month {
                year: year - 1,
                month: 12,
            }),
            Self::Month { year, month } => match month.checked_sub(1) {
                Some(month) => Some(Self::Month { year, month }),
                None => None,
            },
            Self::Year(year) => Some(Self::Year(year - 1)),
            Self::All => None,
        }
    }

    /// Orders placed in this period.
    pub fn filter<'a>(&self, orders: &'a [Order]) -> impl Iterator<Item = &'a Order> + use<'a> {
        let period = *self;
        orders.iter().filter(move |order| period.contains(order.date))
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{month:02}/{year}"),
            Self::Year(year) => write!(f, "{year}"),
            Self::All => f.write_str("toàn thời gian"),
        }
    }
}

/// Revenue per calendar month of one year, with bar heights for a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyChart {
    pub year: i32,
    /// January first.
    pub totals: [Price; 12],
    /// Each month as a percentage of the best month (`max(best, 1)`).
    pub bars: [Decimal; 12],
}

impl MonthlyChart {
    /// Bucket every order of `year` by month.
    #[must_use]
    pub fn for_year(orders: &[Order], year: i32) -> Self {
        let mut totals = [Price::ZERO; 12];
        for order in ReportPeriod::Year(year).filter(orders) {
            if let Some(bucket) = totals.get_mut(order.date.month0() as usize) {
                *bucket += order.total_price();
            }
        }
        let max = totals
            .iter()
            .copied()
            .max()
            .unwrap_or(Price::ZERO)
            .max(Price::new(1));
        let bars = totals.map(|total| percent_of(total.to_decimal(), max.to_decimal()));
        Self { year, totals, bars }
    }
}

/// Everything the monthly report page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub period: ReportPeriod,
    pub revenue: PeriodRevenue,
    pub previous_revenue: PeriodRevenue,
    pub growth_percent: Decimal,
    pub top_products: Vec<ProductRanking>,
    pub top_customers: Vec<CustomerRanking>,
    pub chart: MonthlyChart,
}

impl MonthlyReport {
    /// Build the report for `month`/`year`, compared to the previous month.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMonth` for a month outside 1-12.
    pub fn build(
        orders: &[Order],
        year: i32,
        month: u32,
        sort: CustomerSort,
    ) -> Result<Self, ValidationError> {
        let period = ReportPeriod::month(year, month)?;
        let revenue = period_revenue(orders, |o| period.contains(o.date));
        let previous_revenue = period
            .previous()
            .map(|prev| period_revenue(orders, |o| prev.contains(o.date)))
            .unwrap_or_default();

        Ok(Self {
            period,
            revenue,
            previous_revenue,
            growth_percent: growth_rate(revenue.total, previous_revenue.total),
            top_products: top_products(period.filter(orders)),
            top_customers: top_customers(period.filter(orders), sort),
            chart: MonthlyChart::for_year(orders, year),
        })
    }
}

/// Orders the kitchen has not started or is still kneading.
#[must_use]
pub fn pending_count(orders: &[Order]) -> usize {
    orders.iter().filter(|o| o.status.is_new()).count()
}

/// `part * 100 / whole`, rounded to two places; 0 when `whole` is 0.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .map_or(Decimal::ZERO, |p| p.round_dp(2))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::models::OrderItem;
    use crate::types::OrderStatus;

    const BANH_MI: &str = "Bánh Mì Phô Mai Chảy";

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .expect("valid datetime")
    }

    fn order(
        customer: &str,
        product: &str,
        price: i64,
        qty: u32,
        fee: i64,
        when: NaiveDateTime,
    ) -> Order {
        Order::builder(customer)
            .item(OrderItem {
                product_name: product.to_string(),
                product_image: String::new(),
                price: Price::new(price),
                quantity: qty,
            })
            .shipping_fee(Price::new(fee))
            .address("Quận 1")
            .placed_at(when)
            .build()
            .expect("valid order")
    }

    #[test]
    fn test_batch_progress_clamps_to_100() {
        // 100 orders, 37 units in total
        let orders: Vec<Order> = (0..100u32)
            .map(|i| {
                let qty = u32::from(i < 37);
                let name = if qty == 1 { BANH_MI } else { "Bánh Kem Dâu Tây" };
                order("Lan", name, 45_000, 1, 0, at(2025, 3, 1 + i % 28))
            })
            .collect();

        let progress = batch_progress(&orders, BANH_MI, 10);
        assert_eq!(progress.current, 37);
        assert_eq!(progress.target, 10);
        assert_eq!(progress.percent, Decimal::ONE_HUNDRED);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_batch_progress_zero_target() {
        let progress = batch_progress(&[], BANH_MI, 0);
        assert_eq!(progress.percent, Decimal::ZERO);

        let orders = vec![order("Lan", BANH_MI, 45_000, 3, 0, at(2025, 3, 1))];
        let progress = batch_progress(&orders, BANH_MI, 0);
        assert_eq!(progress.percent, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_batch_progress_ignores_status() {
        let mut done = order("Lan", BANH_MI, 45_000, 2, 0, at(2025, 3, 1));
        done.status = OrderStatus::Completed;
        let orders = vec![done, order("Hoa", BANH_MI, 45_000, 2, 0, at(2025, 3, 2))];

        let progress = batch_progress(&orders, BANH_MI, 10);
        assert_eq!(progress.current, 4);
        assert_eq!(progress.percent, Decimal::from(40));
    }

    #[test]
    fn test_batch_percent_always_in_range() {
        for current in [0u32, 1, 9, 10, 11, 1_000] {
            for target in [0u32, 1, 7, 10, 5_000] {
                let orders = if current == 0 {
                    Vec::new()
                } else {
                    vec![order("Lan", BANH_MI, 1, current, 0, at(2025, 1, 1))]
                };
                let p = batch_progress(&orders, BANH_MI, target).percent;
                assert!(
                    p >= Decimal::ZERO && p <= Decimal::ONE_HUNDRED,
                    "{current}/{target} -> {p}"
                );
            }
        }
    }

    #[test]
    fn test_period_revenue_splits_shipping() {
        let orders = vec![
            order("Lan", BANH_MI, 45_000, 2, 15_000, at(2025, 3, 1)),
            order("Hoa", BANH_MI, 45_000, 1, 0, at(2025, 3, 5)),
            order("Hoa", BANH_MI, 45_000, 1, 10_000, at(2025, 4, 1)),
        ];
        let march = ReportPeriod::Month { year: 2025, month: 3 };
        let revenue = period_revenue(&orders, |o| march.contains(o.date));

        assert_eq!(revenue.total, Price::new(150_000));
        assert_eq!(revenue.shipping_revenue, Price::new(15_000));
        assert_eq!(revenue.product_revenue, Price::new(135_000));
        assert_eq!(revenue.order_count, 2);
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(growth_rate(Price::new(150), Price::new(100)), Decimal::from(50));
        assert_eq!(growth_rate(Price::new(50), Price::new(100)), Decimal::from(-50));
        assert_eq!(growth_rate(Price::new(1_000_000), Price::ZERO), Decimal::ZERO);
        assert_eq!(growth_rate(Price::ZERO, Price::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_top_products_ranked_by_revenue() {
        let orders = vec![
            order("Lan", "Bánh Kem Dâu Tây", 55_000, 1, 0, at(2025, 3, 1)),
            order("Hoa", BANH_MI, 45_000, 3, 15_000, at(2025, 3, 2)),
            order("Mai", "Bánh Kem Dâu Tây", 55_000, 1, 0, at(2025, 3, 3)),
        ];
        let ranked = top_products(&orders);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, BANH_MI);
        assert_eq!(ranked[0].revenue, Price::new(135_000));
        assert_eq!(ranked[0].quantity, 3);
        assert_eq!(ranked[1].revenue, Price::new(110_000));
        // 135000 / 245000
        assert_eq!(ranked[0].share_percent, Decimal::new(5510, 2));
    }

    #[test]
    fn test_top_customers_sorting_and_ties() {
        let orders = vec![
            order("Lan", BANH_MI, 50_000, 1, 0, at(2025, 3, 1)),
            order("Hoa", BANH_MI, 100_000, 1, 0, at(2025, 3, 2)),
            order("Mai", BANH_MI, 50_000, 1, 0, at(2025, 3, 3)),
            order("Mai", BANH_MI, 10_000, 1, 0, at(2025, 3, 4)),
        ];

        let by_spend = top_customers(&orders, CustomerSort::TotalSpent);
        let names: Vec<_> = by_spend.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Hoa", "Mai", "Lan"]);
        assert_eq!(by_spend[0].share_percent, Decimal::new(4762, 2));

        let by_count = top_customers(&orders, CustomerSort::OrderCount);
        let names: Vec<_> = by_count.iter().map(|c| c.name.as_str()).collect();
        // Lan and Hoa tie on one order each and keep first-seen order
        assert_eq!(names, ["Mai", "Lan", "Hoa"]);
    }

    #[test]
    fn test_previous_period() {
        assert_eq!(
            ReportPeriod::Month { year: 2025, month: 1 }.previous(),
            Some(ReportPeriod::Month { year: 2024, month: 12 })
        );
        assert_eq!(
            ReportPeriod::Month { year: 2025, month: 3 }.previous(),
            Some(ReportPeriod::Month { year: 2025, month: 2 })
        );
        assert_eq!(ReportPeriod::Year(2025).previous(), Some(ReportPeriod::Year(2024)));
        assert_eq!(ReportPeriod::All.previous(), None);
        // unchecked months have no predecessor instead of underflowing
        assert_eq!(ReportPeriod::Month { year: 2025, month: 0 }.previous(), None);
    }

    #[test]
    fn test_month_constructor_rejects_out_of_range() {
        assert_eq!(
            ReportPeriod::month(2025, 12),
            Ok(ReportPeriod::Month { year: 2025, month: 12 })
        );
        assert_eq!(ReportPeriod::month(2025, 0), Err(ValidationError::InvalidMonth(0)));
        assert_eq!(ReportPeriod::month(2025, 13), Err(ValidationError::InvalidMonth(13)));
    }

    #[test]
    fn test_monthly_report_rejects_invalid_month() {
        for month in [0, 13] {
            assert_eq!(
                MonthlyReport::build(&[], 2025, month, CustomerSort::TotalSpent),
                Err(ValidationError::InvalidMonth(month))
            );
        }
    }

    #[test]
    fn test_monthly_chart_scales_to_best_month() {
        let orders = vec![
            order("Lan", BANH_MI, 100_000, 1, 0, at(2025, 1, 10)),
            order("Lan", BANH_MI, 50_000, 1, 0, at(2025, 2, 10)),
            order("Lan", BANH_MI, 999_000, 1, 0, at(2024, 2, 10)),
        ];
        let chart = MonthlyChart::for_year(&orders, 2025);

        assert_eq!(chart.totals[0], Price::new(100_000));
        assert_eq!(chart.totals[1], Price::new(50_000));
        assert_eq!(chart.bars[0], Decimal::ONE_HUNDRED);
        assert_eq!(chart.bars[1], Decimal::from(50));
        assert_eq!(chart.bars[11], Decimal::ZERO);

        let empty = MonthlyChart::for_year(&[], 2025);
        assert!(empty.bars.iter().all(|b| b.is_zero()));
    }

    #[test]
    fn test_monthly_report() {
        let orders = vec![
            order("Lan", BANH_MI, 45_000, 2, 0, at(2025, 2, 10)),
            order("Hoa", BANH_MI, 45_000, 4, 0, at(2025, 3, 10)),
        ];
        let report =
            MonthlyReport::build(&orders, 2025, 3, CustomerSort::default()).expect("report");

        assert_eq!(report.revenue.total, Price::new(180_000));
        assert_eq!(report.previous_revenue.total, Price::new(90_000));
        assert_eq!(report.growth_percent, Decimal::ONE_HUNDRED);
        assert_eq!(report.top_customers.len(), 1);
        assert_eq!(report.top_customers[0].name, "Hoa");
        assert_eq!(report.period.to_string(), "03/2025");
    }

    #[test]
    fn test_pending_count() {
        let mut baking = order("Lan", BANH_MI, 1, 1, 0, at(2025, 3, 1));
        baking.status = OrderStatus::Baking;
        let mut delivering = order("Lan", BANH_MI, 1, 1, 0, at(2025, 3, 1));
        delivering.status = OrderStatus::Delivering;
        let pending = order("Lan", BANH_MI, 1, 1, 0, at(2025, 3, 1));

        assert_eq!(pending_count(&[baking, delivering, pending]), 2);
    }
}
