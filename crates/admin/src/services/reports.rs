//! Revenue reports and their printable HTML.

use askama::Template;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::instrument;

use mian_bakery_core::report::{
    CustomerSort, MonthlyReport, PeriodRevenue, ReportPeriod, period_revenue,
};
use mian_bakery_core::Price;
use mian_bakery_store::{OrderRepository, RecordStore, SettingsRepository};

use crate::error::Result;

/// One bar of the yearly revenue chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    /// `T1` to `T12`.
    pub label: String,
    pub total: Price,
    /// Height relative to the best month, 0-100.
    pub bar: Decimal,
}

/// Printable monthly report.
#[derive(Template)]
#[template(path = "reports/monthly.html")]
pub struct MonthlyReportPage<'a> {
    pub report: &'a MonthlyReport,
    pub shop_phone: &'a str,
    pub generated_on: NaiveDate,
    pub chart_rows: Vec<ChartRow>,
}

impl<'a> MonthlyReportPage<'a> {
    #[must_use]
    pub fn new(report: &'a MonthlyReport, shop_phone: &'a str, generated_on: NaiveDate) -> Self {
        let chart_rows = (1..=12)
            .zip(report.chart.totals.iter().zip(report.chart.bars.iter()))
            .map(|(month, (total, bar))| ChartRow {
                label: format!("T{month}"),
                total: *total,
                bar: *bar,
            })
            .collect();
        Self {
            report,
            shop_phone,
            generated_on,
            chart_rows,
        }
    }

    /// Growth is shown with an explicit sign.
    fn growth_label(&self) -> String {
        let growth = self.report.growth_percent;
        if growth.is_sign_positive() && !growth.is_zero() {
            format!("+{growth}%")
        } else {
            format!("{growth}%")
        }
    }
}

/// Report service.
pub struct ReportService<'a> {
    store: &'a RecordStore,
}

impl<'a> ReportService<'a> {
    /// Create a new report service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Report for `month`/`year`, compared to the month before.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a month outside 1-12.
    #[instrument(skip(self))]
    pub async fn monthly(
        &self,
        year: i32,
        month: u32,
        sort: CustomerSort,
    ) -> Result<MonthlyReport> {
        let orders = OrderRepository::new(self.store).list().await?;
        Ok(MonthlyReport::build(&orders, year, month, sort)?)
    }

    /// Revenue over any period.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    pub async fn revenue(&self, period: ReportPeriod) -> Result<PeriodRevenue> {
        let orders = OrderRepository::new(self.store).list().await?;
        Ok(period_revenue(period.filter(&orders), |_| true))
    }

    /// Printable HTML of the monthly report.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a bad month and
    /// `AdminError::Render` if the template fails.
    #[instrument(skip(self))]
    pub async fn monthly_html(&self, year: i32, month: u32, sort: CustomerSort) -> Result<String> {
        let report = self.monthly(year, month, sort).await?;
        let settings = SettingsRepository::new(self.store).shop_settings().await?;
        let page =
            MonthlyReportPage::new(&report, &settings.bakery_phone, Local::now().date_naive());
        Ok(page.render()?)
    }
}
