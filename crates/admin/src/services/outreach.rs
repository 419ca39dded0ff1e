//! Customer outreach for a batch: who to invite, and what to text them.
//!
//! Customers are derived from past orders that carry a phone number. Claude
//! ranks them for a batched product and drafts SMS invitations; the shop
//! owner sends them from the device through an `sms:` link.

use askama::Template;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};

use mian_bakery_core::ai::{CompletionRequest, TextGenerator, complete_or_fallback};
use mian_bakery_core::handoff::{sms_uri, tel_uri};
use mian_bakery_core::{Order, Phone, Price, Product, ProductId};
use mian_bakery_store::{OrderRepository, ProductRepository, RecordStore};

use crate::error::{AdminError, Result};

/// Score from which a match counts as a strong lead.
pub const HIGH_MATCH_SCORE: f64 = 80.0;

/// A customer as seen through their orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// The phone number; also the ID given to Claude.
    pub id: String,
    /// Name on the most recent order.
    pub name: String,
    #[serde(skip)]
    pub phone: Phone,
    pub order_count: usize,
    pub total_spent: Price,
    pub last_order: NaiveDate,
    /// Distinct product names, most ordered first.
    pub favourite_products: Vec<String>,
}

/// Build the customer list from orders, most recent customer first.
///
/// Orders without a phone (walk-ins) are skipped.
#[must_use]
pub fn customers_from_orders(orders: &[Order]) -> Vec<Customer> {
    let mut customers: Vec<(Customer, Vec<(String, u32)>)> = Vec::new();

    for order in orders {
        let Some(phone) = &order.customer_phone else {
            continue;
        };
        let index = if let Some(i) = customers.iter().position(|(c, _)| &c.phone == phone) {
            i
        } else {
            customers.push((
                Customer {
                    id: phone.as_str().to_string(),
                    name: order.customer_name.clone(),
                    phone: phone.clone(),
                    order_count: 0,
                    total_spent: Price::ZERO,
                    last_order: order.date,
                    favourite_products: Vec::new(),
                },
                Vec::new(),
            ));
            customers.len() - 1
        };
        let Some((customer, counts)) = customers.get_mut(index) else {
            continue;
        };

        customer.order_count += 1;
        customer.total_spent += order.total_price();
        if order.date > customer.last_order {
            customer.last_order = order.date;
            customer.name.clone_from(&order.customer_name);
        }
        for item in order.items() {
            if let Some((_, qty)) = counts.iter_mut().find(|(name, _)| name == &item.product_name) {
                *qty = qty.saturating_add(item.quantity);
            } else {
                counts.push((item.product_name.clone(), item.quantity));
            }
        }
    }

    let mut customers: Vec<Customer> = customers
        .into_iter()
        .map(|(mut customer, mut counts)| {
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            customer.favourite_products = counts.into_iter().map(|(name, _)| name).collect();
            customer
        })
        .collect();
    customers.sort_by(|a, b| b.last_order.cmp(&a.last_order));
    customers
}

/// Claude's verdict on one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMatch {
    pub customer_id: String,
    /// 0-100.
    pub match_score: f64,
    pub reason: String,
}

impl CustomerMatch {
    /// Whether this customer is a strong lead.
    #[must_use]
    pub fn is_high(&self) -> bool {
        self.match_score >= HIGH_MATCH_SCORE
    }
}

/// A drafted invitation, ready to hand off to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsInvite {
    pub body: String,
    /// Opens the messaging app with the body filled in.
    pub sms_uri: String,
    /// Opens the dialer.
    pub tel_uri: String,
}

#[derive(Template)]
#[template(path = "prompts/customer_match.txt")]
struct MatchPrompt<'a> {
    batch_name: &'a str,
    customers_json: String,
}

#[derive(Template)]
#[template(path = "prompts/sms_invite.txt")]
struct InvitePrompt<'a> {
    customer_name: &'a str,
    product_name: &'a str,
    favourite_products: &'a [String],
}

/// Schema of the match response.
fn match_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "customerId": { "type": "string" },
                "matchScore": { "type": "number" },
                "reason": { "type": "string" }
            },
            "required": ["customerId", "matchScore", "reason"]
        }
    })
}

/// Invitation used when generation is unavailable.
#[must_use]
pub fn fallback_invite(customer_name: &str, product_name: &str) -> String {
    format!(
        "Bếp Mian chào chị {customer_name}, \
         mẻ bánh {product_name} thơm ngon đã sẵn sàng phục vụ chị!"
    )
}

/// Parse Claude's match list, keeping only known customers with a score in
/// range. Anything unreadable yields an empty list.
fn parse_matches(raw: &str, customers: &[Customer]) -> Vec<CustomerMatch> {
    let matches: Vec<CustomerMatch> = match serde_json::from_str(raw) {
        Ok(matches) => matches,
        Err(e) => {
            warn!(error = %e, "customer match response is not a match list");
            return Vec::new();
        }
    };
    matches
        .into_iter()
        .filter(|m| customers.iter().any(|c| c.id == m.customer_id))
        .map(|mut m| {
            m.match_score = m.match_score.clamp(0.0, 100.0);
            m
        })
        .collect()
}

/// Outreach service.
pub struct OutreachService<'a, G> {
    store: &'a RecordStore,
    generator: &'a G,
}

impl<'a, G: TextGenerator> OutreachService<'a, G> {
    /// Create a new outreach service.
    #[must_use]
    pub const fn new(store: &'a RecordStore, generator: &'a G) -> Self {
        Self { store, generator }
    }

    /// Customers who have ordered with a phone number.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if the store cannot be read.
    pub async fn customers(&self) -> Result<Vec<Customer>> {
        let orders = OrderRepository::new(self.store).list().await?;
        Ok(customers_from_orders(&orders))
    }

    /// Rank customers for the batch of `product_id`, best match first.
    ///
    /// Returns an empty list when generation fails.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` for an unknown product.
    #[instrument(skip(self))]
    pub async fn match_customers(&self, product_id: &ProductId) -> Result<Vec<CustomerMatch>> {
        let product = self.product(product_id).await?;
        let customers = self.customers().await?;
        if customers.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = MatchPrompt {
            batch_name: &product.name,
            customers_json: serde_json::to_string(&customers)?,
        }
        .render()?;
        let raw = complete_or_fallback(
            self.generator,
            &CompletionRequest::json(prompt, match_schema()),
            "[]",
        )
        .await;

        let mut matches = parse_matches(&raw, &customers);
        matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        info!(count = matches.len(), "customers matched");
        Ok(matches)
    }

    /// Draft an SMS inviting the customer with `phone` to the batch of
    /// `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` for an unknown product or a phone with
    /// no orders.
    #[instrument(skip(self))]
    pub async fn sms_invite(&self, phone: &str, product_id: &ProductId) -> Result<SmsInvite> {
        let product = self.product(product_id).await?;
        let customer = self
            .customers()
            .await?
            .into_iter()
            .find(|c| c.id == phone)
            .ok_or_else(|| AdminError::NotFound(format!("customer {phone}")))?;

        let fallback = fallback_invite(&customer.name, &product.name);
        let prompt = InvitePrompt {
            customer_name: &customer.name,
            product_name: &product.name,
            favourite_products: &customer.favourite_products,
        }
        .render()?;
        let body =
            complete_or_fallback(self.generator, &CompletionRequest::text(prompt), fallback).await;

        Ok(SmsInvite {
            sms_uri: sms_uri(&customer.phone, &body),
            tel_uri: tel_uri(&customer.phone),
            body,
        })
    }

    async fn product(&self, id: &ProductId) -> Result<Product> {
        ProductRepository::new(self.store)
            .get(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("product {id}")))
    }
}
