use std::sync::Arc;

use crate::core::intent::{classify_topic, Topic};
use crate::services::completion::CompletionClient;
use crate::services::context::UserContext;
use crate::services::store::DocumentStore;

/// Reply from the advice assistant
#[derive(Debug)]
pub struct AdvisorReply {
    pub response: String,
    pub sources: Vec<String>,
    pub topic: Topic,
}

/// Advice assistant pipeline: classify the message to a topic, load the
/// user's context, then generate a reply — LLM-backed when a completion
/// client is configured, templated otherwise. The LLM path degrades to the
/// templates on any error.
pub struct Advisor {
    store: Arc<DocumentStore>,
    completion: Option<Arc<CompletionClient>>,
}

impl Advisor {
    pub fn new(store: Arc<DocumentStore>, completion: Option<Arc<CompletionClient>>) -> Self {
        Self { store, completion }
    }

    pub async fn run(&self, message: &str) -> AdvisorReply {
        let (topic, matched) = classify_topic(message);
        tracing::debug!("Classified message to topic {:?} via {:?}", topic, matched);

        let ctx = UserContext::load(&self.store);

        if let Some(client) = &self.completion {
            match self.llm_reply(client, message, &ctx).await {
                Ok(response) => {
                    return AdvisorReply {
                        response,
                        sources: vec![
                            "Stash AI (GPT-powered)".to_string(),
                            format!("{} data", topic.label()),
                        ],
                        topic,
                    };
                }
                Err(e) => {
                    tracing::warn!("LLM reply failed, falling back to templates: {}", e);
                }
            }
        }

        let (response, sources) = template_reply(topic, message, &ctx);
        AdvisorReply { response, sources, topic }
    }

    async fn llm_reply(
        &self,
        client: &CompletionClient,
        message: &str,
        ctx: &UserContext,
    ) -> Result<String, crate::services::completion::CompletionError> {
        let system_prompt = format!(
            "You are Stash AI, an intelligent financial assistant for international students in Dublin, Ireland. \
             You have COMPLETE knowledge of this user's finances, spending habits, streaks, squad debts, grocery prices, \
             FX rates, perks, and everything in their student life.\n\n\
             RULES:\n\
             - Be friendly, concise, and use relevant emojis\n\
             - Give actionable advice with SPECIFIC numbers from their data\n\
             - Reference their actual balance, spending, streaks, etc.\n\
             - If they ask about something, connect it to their financial situation\n\
             - Keep responses under 200 words\n\n\
             USER DATA:\n{}\n\n\
             Additional context: {}",
            ctx.user_summary(),
            ctx.budget_summary(),
        );

        client.chat(&system_prompt, message, 500, 0.7).await
    }
}

/// Template reply for a topic (no API key needed)
pub fn template_reply(topic: Topic, message: &str, ctx: &UserContext) -> (String, Vec<String>) {
    let budget_summary = ctx.budget_summary();
    match topic {
        Topic::Irp => gen_irp(),
        Topic::Grocery => gen_grocery(message, ctx),
        Topic::Fx => gen_fx(ctx),
        Topic::Budget => gen_budget(ctx, &budget_summary),
        Topic::Streak => gen_streak(ctx),
        Topic::Transport => gen_transport(),
        Topic::Accommodation => gen_accommodation(),
        Topic::Community => gen_community(),
        Topic::Perks => gen_perks(ctx),
        Topic::Squad => gen_squad(ctx),
        Topic::Market => gen_market(),
        Topic::General => gen_general(ctx, &budget_summary),
    }
}

fn gen_irp() -> (String, Vec<String>) {
    (
        "To apply for your IRP (Irish Residence Permit):\n\n\
         1️⃣ **Book an appointment** at burghquayregistrationoffice.inis.gov.ie\n\
         2️⃣ **Bring these documents:**\n   \
         • Valid passport\n   \
         • College enrollment letter\n   \
         • Proof of address (utility bill or bank statement)\n   \
         • Proof of finances (€3,000 in bank for Stamp 2)\n   \
         • €300 fee (card only)\n\
         3️⃣ **Attend your appointment** — you'll get your IRP card in ~2 weeks\n\n\
         ⚠️ **Pro Tip:** Slots fill up fast! Check every morning at 10am for new releases. \
         Some students use browser auto-refresh extensions to grab slots."
            .to_string(),
        vec!["Immigration Service Delivery (ISD)".to_string(), "INIS.gov.ie".to_string()],
    )
}

const GROCERY_ITEM_KEYWORDS: &[&str] = &[
    "milk", "bread", "rice", "eggs", "chicken", "curd", "yogurt", "butter", "cheese", "banana",
];

fn gen_grocery(message: &str, ctx: &UserContext) -> (String, Vec<String>) {
    let msg = message.to_lowercase();
    let found = GROCERY_ITEM_KEYWORDS.iter().find(|kw| msg.contains(**kw));

    if let (Some(keyword), Some(grocery)) = (found, &ctx.grocery) {
        let matched: Vec<_> = grocery
            .items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(*keyword))
            .take(5)
            .collect();

        if !matched.is_empty() {
            let mut lines = Vec::new();
            for item in &matched {
                let prices = item
                    .stores
                    .iter()
                    .map(|s| format!("{}: €{}", s.store, s.price))
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Some(cheapest) = item.cheapest() {
                    lines.push(format!("• {}: {} → Cheapest at {}", item.name, prices, cheapest.store));
                }
            }
            return (
                format!(
                    "Here's what I found for **{}** across Dublin stores:\n\n{}\n\n\
                     💡 **Tip:** Check the **Grocery tab** for the full price comparison!",
                    keyword,
                    lines.join("\n"),
                ),
                vec!["Grocery Prices Database".to_string()],
            );
        }
    }

    (
        "For the cheapest groceries in Dublin:\n\n\
         🥇 **Lidl** — Best overall prices\n\
         🥈 **Aldi** — Very competitive, great weekly specials\n\
         🥉 **Tesco** — More variety but pricier. Use your Clubcard!\n\n\
         🛒 **Smart Shopping Tips:**\n\
         • Shop in the evening for yellow sticker reductions\n\
         • Buy own-brand products (30-50% cheaper)\n\
         • Batch cook on Sundays\n\n\
         💡 Use the **Grocery tab** for item-by-item comparisons!"
            .to_string(),
        vec!["Grocery Prices Database".to_string()],
    )
}

fn gen_fx(ctx: &UserContext) -> (String, Vec<String>) {
    let (rate, best) = ctx
        .fx
        .as_ref()
        .map(|fx| (fx.current_rate.to_string(), fx.best_time_to_transfer.clone()))
        .unwrap_or_else(|| ("N/A".to_string(), "N/A".to_string()));

    (
        format!(
            "📊 **FX Update:**\n\n\
             Current rate: ₹1 = €{}\n\
             Best time: {}\n\n\
             🏦 **Best Services (by fees):**\n\
             1. **Wise** — ~0.4% fee, mid-market rate\n\
             2. **Remitly** — Fast, decent rates\n\
             3. **Revolut** — Good for small amounts\n\n\
             💡 Set rate alerts on the **FX tab** for optimal timing.",
            rate, best,
        ),
        vec!["FX Rates Database".to_string(), "User Profile".to_string()],
    )
}

fn gen_budget(ctx: &UserContext, budget_summary: &str) -> (String, Vec<String>) {
    let remaining = ctx
        .budget
        .as_ref()
        .map(|b| b.daily_budget - b.spent_today)
        .unwrap_or(0.0);

    let status = if remaining > 20.0 {
        "✅ You're doing great today!"
    } else if remaining > 5.0 {
        "⚠️ Getting tight — stick to essentials."
    } else {
        "🚨 Almost out! Skip non-essentials."
    };

    (
        format!(
            "📊 **Budget Snapshot:**\n\n{}\n\n{}\n\n\
             💡 **Quick Savings Tips:**\n\
             • Cook at home — saves €8-15 per meal\n\
             • Use student discounts (Perks tab)\n\
             • Walk or cycle instead of transport",
            budget_summary, status,
        ),
        vec!["Budget Data".to_string(), "User Profile".to_string()],
    )
}

fn gen_streak(ctx: &UserContext) -> (String, Vec<String>) {
    let completed = ctx.missions.iter().filter(|m| m.completed).count();
    let (current, longest, under_budget, milestones) = ctx
        .streaks
        .as_ref()
        .map(|s| (s.current_streak, s.longest_streak, s.today_under_budget, s.milestones.clone()))
        .unwrap_or((0, 0, false, vec![]));

    let mut ms_text = String::new();
    for m in &milestones {
        let status = if m.achieved {
            "✅".to_string()
        } else {
            format!("🔒 ({}d needed)", m.days)
        };
        ms_text.push_str(&format!("• {} {} — {} {}\n", m.emoji, m.label, m.reward, status));
    }

    (
        format!(
            "🔥 **Streak Status:**\n\n\
             • Current: **{} days**\n\
             • Longest: **{} days**\n\
             • Today under budget: {}\n\
             • Missions: **{}/{}** done\n\n\
             **Milestones:**\n{}\n\
             Keep it going! 🎯",
            current,
            longest,
            if under_budget { "✅ Yes!" } else { "❌ Not yet" },
            completed,
            ctx.missions.len(),
            ms_text,
        ),
        vec!["Streak Data".to_string(), "Survival Missions".to_string()],
    )
}

fn gen_transport() -> (String, Vec<String>) {
    (
        "🚌 **Getting Around Dublin on a Budget:**\n\n\
         • **Student Leap Card** — 30% off bus/Luas/DART\n\
         • **Dublin Bikes** — €35/year for trips under 30 min\n\
         • **Walking** — City center is very walkable\n\n\
         **Airport to City:**\n\
         • Dublin Bus 16 — ~€3.30 (cheapest)\n\
         • Airlink 747 — €7 (fast, direct)\n\
         • Aircoach — €8 (24/7)\n\
         • Taxi — €25-35 (share with friends)\n\n\
         💡 If you spend >€40/month on transport, get Dublin Bikes!"
            .to_string(),
        vec!["Dublin Transport Guide".to_string()],
    )
}

fn gen_accommodation() -> (String, Vec<String>) {
    (
        "🏠 **Finding Accommodation in Dublin:**\n\n\
         **Where to Search:**\n\
         • Daft.ie, Rent.ie, Facebook Groups\n\
         • Stash Community tab for sublets!\n\n\
         **Average Prices (shares):**\n\
         • D1-2 (city): €800-1200/mo\n\
         • D4-6 (Ranelagh): €700-1000/mo\n\
         • D7-9 (Phibsboro): €600-900/mo\n\n\
         ⚠️ Never pay before viewing!"
            .to_string(),
        vec!["Dublin Housing Guide".to_string(), "Community Posts".to_string()],
    )
}

fn gen_community() -> (String, Vec<String>) {
    (
        "👥 **Community Features:**\n\n\
         • **OFFERING** — Share items, sublets, tips\n\
         • **SEEKING** — Find rooms, study groups, advice\n\
         • **AI Matchmaker** — Auto-connects seekers & offerers!\n\n\
         Go to the **Community tab** to browse or create a post!"
            .to_string(),
        vec!["Community System".to_string()],
    )
}

fn gen_perks(ctx: &UserContext) -> (String, Vec<String>) {
    let hot: Vec<_> = ctx.perks.iter().filter(|p| p.is_hot).collect();
    let mut text = format!("🎁 **{} active deals** for you!\n\n", ctx.perks.len());
    if !hot.is_empty() {
        text.push_str("🔥 **Hot Deals:**\n");
        for p in &hot {
            text.push_str(&format!("• {} **{}** — {}\n", p.logo, p.brand, p.deal));
        }
        text.push('\n');
    }
    text.push_str("Check the **Perks tab** for all deals!");
    (text, vec!["Perks Database".to_string()])
}

fn gen_squad(ctx: &UserContext) -> (String, Vec<String>) {
    let (owed, owing) = ctx.squad_totals();
    (
        format!(
            "👥 **Squad Summary:**\n\n\
             💚 Owed to you: **€{:.2}**\n\
             🔴 You owe: **€{:.2}**\n\
             📊 Net: **€{:.2}**\n\n\
             Use the **Squad tab** to split, nudge, and settle!",
            owed,
            owing,
            owed - owing,
        ),
        vec!["Squad Data".to_string()],
    )
}

fn gen_market() -> (String, Vec<String>) {
    (
        "🛒 **Student Market:**\n\n\
         • **Secondhand** — Save 50-80% on essentials\n\
         • **📦 Starter Kits** — Bundled room setups from graduating students\n\
         • **🔄 Skill Barter** — Trade favors, not money\n\n\
         Browse the **Market tab** for deals!"
            .to_string(),
        vec!["Market Listings".to_string()],
    )
}

fn gen_general(_ctx: &UserContext, budget_summary: &str) -> (String, Vec<String>) {
    (
        format!(
            "Hey! I'm **Stash AI** — your student finance buddy 🎓\n\n\
             I know your finances: {}\n\n\
             Here's what I can help with:\n\n\
             💰 **Money** — Budget, FX rates, grocery prices\n\
             🏙️ **Dublin Life** — IRP, transport, accommodation\n\
             🎯 **Features** — Streaks, perks, community, squad\n\n\
             Try: *\"How's my budget?\"* or *\"Where's the cheapest milk?\"*",
            budget_summary,
        ),
        vec!["User Profile".to_string(), "Budget Data".to_string()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, GroceryItem, GroceryPrices, StorePrice};

    fn ctx_with_budget() -> UserContext {
        UserContext {
            budget: Some(Budget {
                total_balance: 900.0,
                daily_budget: 35.0,
                spent_today: 5.0,
                locked_funds: vec![],
                ghost_items: vec![],
            }),
            ..UserContext::default()
        }
    }

    #[test]
    fn test_budget_template_thresholds() {
        let mut ctx = ctx_with_budget();
        let (reply, sources) = template_reply(Topic::Budget, "how's my budget", &ctx);
        assert!(reply.contains("✅ You're doing great today!"));
        assert_eq!(sources[0], "Budget Data");

        ctx.budget.as_mut().unwrap().spent_today = 28.0;
        let (reply, _) = template_reply(Topic::Budget, "how's my budget", &ctx);
        assert!(reply.contains("⚠️ Getting tight"));

        ctx.budget.as_mut().unwrap().spent_today = 34.0;
        let (reply, _) = template_reply(Topic::Budget, "how's my budget", &ctx);
        assert!(reply.contains("🚨 Almost out!"));
    }

    #[test]
    fn test_grocery_template_finds_item() {
        let ctx = UserContext {
            grocery: Some(GroceryPrices {
                items: vec![GroceryItem {
                    name: "Whole Milk 1L".to_string(),
                    stores: vec![
                        StorePrice { store: "Lidl".to_string(), price: 1.09, on_sale: false },
                        StorePrice { store: "Tesco".to_string(), price: 1.35, on_sale: false },
                    ],
                }],
            }),
            ..UserContext::default()
        };

        let (reply, sources) = template_reply(Topic::Grocery, "where is the cheapest milk?", &ctx);
        assert!(reply.contains("Whole Milk 1L"));
        assert!(reply.contains("Cheapest at Lidl"));
        assert_eq!(sources, vec!["Grocery Prices Database"]);
    }

    #[test]
    fn test_grocery_template_generic_fallback() {
        let ctx = UserContext::default();
        let (reply, _) = template_reply(Topic::Grocery, "cheapest groceries?", &ctx);
        assert!(reply.contains("**Lidl** — Best overall prices"));
    }

    #[test]
    fn test_general_template_embeds_budget_summary() {
        let ctx = ctx_with_budget();
        let (reply, _) = template_reply(Topic::General, "hello", &ctx);
        assert!(reply.contains("Stash AI"));
        assert!(reply.contains("Balance: €900"));
    }

    #[tokio::test]
    async fn test_advisor_runs_on_templates_without_completion() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = Arc::new(DocumentStore::new(tmp.path()));
        let advisor = Advisor::new(store, None);

        let reply = advisor.run("how do I get my IRP appointment?").await;
        assert_eq!(reply.topic, Topic::Irp);
        assert!(reply.response.contains("IRP"));
        assert!(reply.sources.contains(&"INIS.gov.ie".to_string()));
    }
}
