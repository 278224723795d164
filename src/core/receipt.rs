use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structured receipt data reconstructed from OCR text lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedReceipt {
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub price: f64,
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl ParsedReceipt {
    /// Fill the gaps a vision model (or a sparse receipt) may leave:
    /// merchant and date fall back to placeholders, a missing total becomes
    /// the item sum.
    pub fn normalize(&mut self) {
        if self.merchant.is_empty() {
            self.merchant = "Unknown Store".to_string();
        }
        if self.date.is_empty() {
            self.date = chrono::Local::now().format("%Y-%m-%d").to_string();
        }
        if self.currency.is_empty() {
            self.currency = default_currency();
        }
        if self.total == 0.0 && !self.items.is_empty() {
            self.total = round_cents(self.items.iter().map(|i| i.price).sum());
        }
    }
}

static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:EUR|€)\s*(\d+[.,]\d{2})").unwrap());
static STANDALONE_PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+[.,]\d{2})$").unwrap());
static BARE_CURRENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:EUR|€)$").unwrap());
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})").unwrap());
static TIME_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}$").unwrap());

/// Lines that are receipt boilerplate rather than items
const SKIP_KEYWORDS: &[&str] = &[
    "TAX INVOICE", "INVOICE", "RECEIPT", "VISA", "MASTERCARD",
    "CONTACTLESS", "CARD", "CHANGE", "THANK", "RETAIN",
    "RETURN", "WELCOME", "ADDRESS", "TEL", "VAT", "****",
    "SUBTOTAL", "CASHIER",
];

const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"];

fn is_boilerplate(upper: &str) -> bool {
    SKIP_KEYWORDS.iter().any(|kw| upper.contains(kw))
}

fn parse_price(raw: &str) -> f64 {
    raw.replace(',', ".").parse().unwrap_or(0.0)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price from a currency-prefixed match in a line ("EUR 1.65", "€1,65")
fn line_price(line: &str) -> Option<f64> {
    PRICE_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| parse_price(m.as_str()))
}

/// Price from a line that is nothing but digits ("4.50")
fn standalone_price(line: &str) -> Option<f64> {
    STANDALONE_PRICE_RE
        .captures(line.trim())
        .and_then(|c| c.get(1))
        .map(|m| parse_price(m.as_str()))
}

/// Reconstruct structured receipt data from OCR text lines in reading order.
///
/// OCR engines split item/price pairs in several ways:
///   a) "Item Name            EUR 1.65"  (item + price on same line)
///   b) "Item Name" / "EUR 1.65"         (item on line N, price on N+1)
///   c) "Item Name" / "EUR" / "4.50"     (item on N, "EUR" on N+1, digits on N+2)
/// A held-over item name bridges the split-line cases.
pub fn parse_lines(lines: &[String]) -> ParsedReceipt {
    let mut receipt = ParsedReceipt {
        merchant: lines.first().map(|l| l.trim().to_string()).unwrap_or_default(),
        date: String::new(),
        items: Vec::new(),
        total: 0.0,
        currency: default_currency(),
    };

    // Date: first DD/MM/YYYY- or YYYY-MM-DD-shaped token wins
    for line in lines {
        if let Some(m) = DATE_RE.captures(line).and_then(|c| c.get(1)) {
            let raw = m.as_str();
            for fmt in DATE_FORMATS {
                if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, fmt) {
                    receipt.date = date.format("%Y-%m-%d").to_string();
                    break;
                }
            }
            break;
        }
    }

    // The merchant line is consumed above; starting the walk past it keeps
    // the look-ahead from pairing it with the first item's price.
    let mut i = if lines.is_empty() { 0 } else { 1 };
    let mut found_subtotal = false;
    // Item name waiting for its price on a later line
    let mut last_item_name = String::new();

    while i < lines.len() {
        let line = lines[i].trim();
        let upper = line.to_uppercase();

        // Item collection ends at the SUBTOTAL / TOTAL section
        if upper.contains("SUBTOTAL") || upper.contains("SUB TOTAL") || upper.contains("SUB-TOTAL") {
            found_subtotal = true;
            i += 1;
            continue;
        }

        // Capture the TOTAL value
        if upper.contains("TOTAL") && !upper.contains("SUB") {
            if let Some(price) = line_price(line) {
                receipt.total = price;
            } else if i + 1 < lines.len() {
                if let Some(price) = line_price(&lines[i + 1]) {
                    receipt.total = price;
                    i += 1;
                } else if let Some(price) = standalone_price(&lines[i + 1]) {
                    receipt.total = price;
                    i += 1;
                }
            }
            i += 1;
            continue;
        }

        if is_boilerplate(&upper) {
            i += 1;
            continue;
        }

        // Time-only lines (HH:MM)
        if TIME_ONLY_RE.is_match(line) {
            i += 1;
            continue;
        }

        // Date lines are consumed by the date scan, never items
        if DATE_RE.is_match(line) {
            i += 1;
            continue;
        }

        if found_subtotal {
            i += 1;
            continue;
        }

        // Case A: "Item Name  EUR 1.65" on the same line
        if let Some(price) = line_price(line) {
            let name = PRICE_RE.replace_all(line, "").to_string();
            let name = name.trim().trim_end_matches([' ', '-', '–', '—']);
            if !name.is_empty() && !SKIP_KEYWORDS.contains(&name.to_uppercase().as_str()) {
                receipt.items.push(ReceiptItem { name: name.to_string(), price });
                last_item_name.clear();
            }
            i += 1;
            continue;
        }

        // Bare "EUR" line: the price follows on the next line
        if BARE_CURRENCY_RE.is_match(line) {
            if !last_item_name.is_empty() && i + 1 < lines.len() {
                if let Some(price) = standalone_price(&lines[i + 1]) {
                    receipt.items.push(ReceiptItem { name: last_item_name.clone(), price });
                    last_item_name.clear();
                    i += 2;
                    continue;
                }
            }
            i += 1;
            continue;
        }

        // Standalone price: attach to the held item name
        if let Some(price) = standalone_price(line) {
            if !last_item_name.is_empty() {
                receipt.items.push(ReceiptItem { name: last_item_name.clone(), price });
                last_item_name.clear();
                i += 1;
                continue;
            }
        }

        // Candidate item name: check the next line(s) for its price
        let name = line.trim_matches([' ', '-', '–', '—', '.']);
        if !name.is_empty() && !SKIP_KEYWORDS.contains(&name.to_uppercase().as_str()) {
            if i + 1 < lines.len() {
                let next = lines[i + 1].trim();

                // Case B: next line is "EUR X.XX"
                if let Some(price) = line_price(next) {
                    receipt.items.push(ReceiptItem { name: name.to_string(), price });
                    last_item_name.clear();
                    i += 2;
                    continue;
                }

                // Case B2: next line is just "X.XX"
                if let Some(price) = standalone_price(next) {
                    receipt.items.push(ReceiptItem { name: name.to_string(), price });
                    last_item_name.clear();
                    i += 2;
                    continue;
                }

                // Case C: bare "EUR" next, price on the line after
                if BARE_CURRENCY_RE.is_match(next) && i + 2 < lines.len() {
                    if let Some(price) = standalone_price(&lines[i + 2]) {
                        receipt.items.push(ReceiptItem { name: name.to_string(), price });
                        last_item_name.clear();
                        i += 3;
                        continue;
                    }
                }
            }

            // Price not found yet; hold the name for later lines
            last_item_name = name.to_string();
        }

        i += 1;
    }

    receipt.normalize();
    receipt
}
