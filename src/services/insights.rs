use std::sync::Arc;

use crate::models::responses::{InsightCard, InsightsResponse};
use crate::services::completion::{strip_code_fences, CompletionClient, CompletionError};
use crate::services::context::UserContext;
use crate::services::store::DocumentStore;

/// Feature screens that can ask for insights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Dashboard,
    Feed,
    Fx,
    Grocery,
    Community,
    Squad,
    Perks,
    Market,
    Streaks,
    Rewards,
    Profile,
}

impl Feature {
    /// Unknown feature names fall back to the dashboard
    pub fn parse(raw: &str) -> Feature {
        match raw {
            "feed" => Feature::Feed,
            "fx" => Feature::Fx,
            "grocery" => Feature::Grocery,
            "community" => Feature::Community,
            "squad" => Feature::Squad,
            "perks" => Feature::Perks,
            "market" => Feature::Market,
            "streaks" => Feature::Streaks,
            "rewards" => Feature::Rewards,
            "profile" => Feature::Profile,
            _ => Feature::Dashboard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Dashboard => "dashboard",
            Feature::Feed => "feed",
            Feature::Fx => "fx",
            Feature::Grocery => "grocery",
            Feature::Community => "community",
            Feature::Squad => "squad",
            Feature::Perks => "perks",
            Feature::Market => "market",
            Feature::Streaks => "streaks",
            Feature::Rewards => "rewards",
            Feature::Profile => "profile",
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            Feature::Dashboard => {
                "Generate 2-3 concise, actionable financial insights for the user's dashboard. \
                 Analyze their daily spending, budget health, runway, and suggest specific actions. \
                 Consider their streak, locked funds, and upcoming loan date. Be encouraging but honest."
            }
            Feature::Feed => {
                "Analyze the user's recent transactions and spending patterns. \
                 Give 2-3 insights: identify overspending categories, suggest where to cut, \
                 mention missed perks/discounts, and highlight positive habits. Reference specific amounts."
            }
            Feature::Fx => {
                "Give 2-3 FX-specific insights. Consider the current rate, rate trends, \
                 the user's home currency (INR), and their balance. Suggest optimal transfer timing, \
                 amounts to transfer, and compare services (Wise, Remitly, Revolut)."
            }
            Feature::Grocery => {
                "Give 2-3 grocery shopping insights. Based on the user's budget and spending on food/groceries, \
                 suggest the cheapest stores, items on sale, batch cooking tips, \
                 and how much they could save by switching stores. Be specific with prices."
            }
            Feature::Community => {
                "Give 2-3 community engagement insights. Suggest what the user could post \
                 (based on their situation - e.g., looking for roommates, study groups, sharing tips). \
                 Mention how the AI matchmaker can help them connect with relevant posts."
            }
            Feature::Squad => {
                "Give 2-3 squad management insights. Analyze who owes what, suggest who to nudge, \
                 recommend splitting strategies, and calculate the impact on their budget \
                 if all debts were settled. Be specific with names and amounts."
            }
            Feature::Perks => {
                "Give 2-3 perk recommendations. Based on the user's spending categories, \
                 recommend the most relevant discounts they should use. Calculate potential savings. \
                 Mention nearby deals and transport optimization."
            }
            Feature::Market => {
                "Give 2-3 market insights. Based on the user's budget constraints, \
                 suggest what they should buy secondhand vs new, recommend starter kits, \
                 and mention skill barter opportunities relevant to their course."
            }
            Feature::Streaks => {
                "Give 2-3 streak and mission insights. Motivate based on current streak, \
                 suggest which missions to tackle next for maximum coins, \
                 and show what rewards they're closest to unlocking."
            }
            Feature::Rewards => {
                "Give 2-3 rewards shop insights. Based on their coin balance, \
                 suggest the best value rewards to redeem, predict when they'll earn enough \
                 for premium rewards, and motivate continued earning."
            }
            Feature::Profile => {
                "Give 2-3 personalized profile insights. Summarize their financial health score, \
                 highlight achievements they're close to earning, and give a monthly performance summary."
            }
        }
    }
}

/// Per-feature insight generation over the full user context. LLM-backed
/// when a completion client is configured, templated otherwise.
pub struct InsightEngine {
    store: Arc<DocumentStore>,
    completion: Option<Arc<CompletionClient>>,
}

impl InsightEngine {
    pub fn new(store: Arc<DocumentStore>, completion: Option<Arc<CompletionClient>>) -> Self {
        Self { store, completion }
    }

    pub async fn generate(&self, feature: Feature) -> InsightsResponse {
        let ctx = UserContext::load(&self.store);

        if let Some(client) = &self.completion {
            match self.llm_insights(client, feature, &ctx).await {
                Ok(insights) => {
                    return InsightsResponse {
                        insights,
                        source: "Stash AI (GPT-powered)".to_string(),
                        feature: feature.as_str().to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!("LLM insights failed for {}: {}", feature.as_str(), e);
                }
            }
        }

        InsightsResponse {
            insights: template_insights(feature, &ctx),
            source: "Stash AI".to_string(),
            feature: feature.as_str().to_string(),
        }
    }

    async fn llm_insights(
        &self,
        client: &CompletionClient,
        feature: Feature,
        ctx: &UserContext,
    ) -> Result<Vec<InsightCard>, CompletionError> {
        let system_prompt = format!(
            "You are Stash AI, an intelligent financial assistant embedded in a student finance app \
             for international students in Dublin, Ireland. You have COMPLETE knowledge of this user's \
             financial data, spending habits, streaks, squad debts, and preferences.\n\n\
             RULES:\n\
             - Be concise but specific — reference actual numbers from their data\n\
             - Use 1-2 emojis per insight (not excessive)\n\
             - Each insight should be 1-2 sentences max\n\
             - Be actionable — tell them WHAT to do, not just what's happening\n\
             - Be encouraging and friendly, like a smart friend giving advice\n\
             - Format as a JSON array of objects with 'emoji', 'title' (short label), and 'text' (the insight)\n\
             - Return ONLY valid JSON, no markdown\n\n\
             USER DATA:\n{}",
            ctx.user_summary(),
        );

        let raw = client.chat(&system_prompt, feature.prompt(), 500, 0.7).await?;
        let cleaned = strip_code_fences(&raw);
        serde_json::from_str(cleaned)
            .map_err(|e| CompletionError::InvalidResponse(format!("insights not valid JSON: {}", e)))
    }
}

/// Template insights for a feature (no API key needed)
pub fn template_insights(feature: Feature, ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = match feature {
        Feature::Dashboard => insights_dashboard(ctx),
        Feature::Feed => insights_feed(ctx),
        Feature::Fx => insights_fx(ctx),
        Feature::Grocery => insights_grocery(ctx),
        Feature::Community => insights_community(ctx),
        Feature::Squad => insights_squad(ctx),
        Feature::Perks => insights_perks(ctx),
        Feature::Market => insights_market(ctx),
        Feature::Streaks => insights_streaks(ctx),
        Feature::Rewards => insights_rewards(ctx),
        Feature::Profile => insights_profile(ctx),
    };
    insights.truncate(3);
    insights
}

fn card(emoji: &str, title: String, text: String) -> InsightCard {
    InsightCard { emoji: emoji.to_string(), title, text }
}

fn insights_dashboard(ctx: &UserContext) -> Vec<InsightCard> {
    let daily_budget = ctx.budget.as_ref().map(|b| b.daily_budget).unwrap_or(35.0);
    let spent = ctx.budget.as_ref().map(|b| b.spent_today).unwrap_or(0.0);
    let safe = ctx.budget.as_ref().map(|b| b.safe_to_spend()).unwrap_or(0.0);
    let remaining = daily_budget - spent;
    let streak = ctx.streaks.as_ref().map(|s| s.current_streak).unwrap_or(0);

    let daily_avg = ctx.daily_average_spend();
    let days_left = if daily_avg > 0.0 { (safe / daily_avg) as i64 } else { 999 };

    let mut insights = Vec::new();

    if daily_budget > 0.0 && remaining / daily_budget > 0.7 {
        insights.push(card(
            "📈",
            "Great pace today!".to_string(),
            format!(
                "You've only spent €{:.2} of your €{} daily budget. You're on track to save €{:.2} today.",
                spent, daily_budget, remaining
            ),
        ));
    } else if daily_budget > 0.0 && remaining / daily_budget < 0.2 {
        insights.push(card(
            "⚠️",
            "Budget alert".to_string(),
            format!(
                "Only €{:.2} left today. Skip non-essentials to protect your {}-day streak.",
                remaining, streak
            ),
        ));
    }

    if days_left < 30 {
        let loan_date = ctx.user.as_ref().map(|u| u.loan_date.clone()).unwrap_or_default();
        insights.push(card(
            "🔮",
            "Runway warning".to_string(),
            format!(
                "At current spending, you'll run out in ~{} days. Your next loan arrives {}. Consider reducing by €{:.2}/day.",
                days_left,
                loan_date,
                daily_avg - daily_budget
            ),
        ));
    } else {
        insights.push(card(
            "✅",
            "Healthy runway".to_string(),
            format!("At your current pace, your funds will last ~{} days. Keep it up!", days_left),
        ));
    }

    if streak > 0 {
        let next_milestone = ctx.streaks.as_ref().and_then(|s| {
            s.milestones
                .iter()
                .find(|m| !m.achieved && m.days > streak)
                .cloned()
        });
        if let Some(milestone) = next_milestone {
            let days_to = milestone.days - streak;
            insights.push(card(
                "🎯",
                format!("{} days to next reward", days_to),
                format!(
                    "Keep your streak going! You'll unlock '{}' in {} more days.",
                    milestone.reward, days_to
                ),
            ));
        }
    }

    insights
}

fn insights_feed(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let totals = ctx.category_totals(20);
    let overall: f64 = totals.values().sum();
    if let Some((top, amount)) = ctx.top_category(20) {
        insights.push(card(
            "📊",
            format!("Top spend: {}", top),
            format!(
                "You've spent €{:.2} on {} recently. That's {:.0}% of your recent spending.",
                amount,
                top,
                amount / overall * 100.0
            ),
        ));
    }

    let hot_perks: Vec<_> = ctx.perks.iter().filter(|p| p.is_hot).collect();
    let food_spend = totals.get("food").copied().unwrap_or(0.0)
        + totals.get("coffee").copied().unwrap_or(0.0);
    if food_spend > 30.0 {
        if let Some(perk) = hot_perks.first() {
            insights.push(card(
                "🎁",
                "Missed savings!".to_string(),
                format!(
                    "You spent €{:.2} on food/coffee. Use {} ({}) to save next time!",
                    food_spend, perk.brand, perk.deal
                ),
            ));
        }
    }

    if ctx.transactions.len() > 5 {
        let recent_5: f64 = ctx.transactions.iter().take(5).map(|t| t.amount.abs()).sum();
        let prev_5: f64 = ctx.transactions.iter().skip(5).take(5).map(|t| t.amount.abs()).sum();
        if prev_5 > 0.0 {
            let change = (recent_5 - prev_5) / prev_5 * 100.0;
            if change > 15.0 {
                insights.push(card(
                    "📈",
                    "Spending up".to_string(),
                    format!(
                        "Your recent spending is up {:.0}% vs earlier. Watch those impulse purchases!",
                        change
                    ),
                ));
            } else if change < -15.0 {
                insights.push(card(
                    "👏",
                    "Spending down!".to_string(),
                    format!(
                        "Great job! Your spending dropped {:.0}% recently. Your discipline is paying off.",
                        change.abs()
                    ),
                ));
            }
        }
    }

    insights
}

fn insights_fx(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let rate = ctx.fx.as_ref().map(|f| f.current_rate).unwrap_or(0.0);
    let samples = ctx.fx.as_ref().map(|f| f.historical_rates.clone()).unwrap_or_default();

    if !samples.is_empty() {
        let avg_rate: f64 = samples.iter().map(|s| s.rate).sum::<f64>() / samples.len() as f64;
        if rate > avg_rate * 1.02 {
            insights.push(card(
                "🟢",
                "Good time to transfer!".to_string(),
                format!(
                    "Current rate (€{:.4}/₹) is {:.1}% above the 30-day average. Transfer now to get more euros.",
                    rate,
                    (rate - avg_rate) / avg_rate * 100.0
                ),
            ));
        } else if rate < avg_rate * 0.98 {
            insights.push(card(
                "🔴",
                "Hold off on transfers".to_string(),
                format!(
                    "Rate is {:.1}% below average. Wait a few days for a better rate if you can.",
                    (avg_rate - rate) / avg_rate * 100.0
                ),
            ));
        } else {
            insights.push(card(
                "📊",
                "Rate is average".to_string(),
                format!(
                    "Current rate €{:.4}/₹ is near the 30-day average. Transfer if you need to, but no rush.",
                    rate
                ),
            ));
        }
    }

    let safe = ctx
        .budget
        .as_ref()
        .map(|b| b.total_balance - b.locked_total())
        .unwrap_or(0.0);
    if safe < 200.0 && rate > 0.0 {
        let inr_needed = (200.0 / rate) as i64;
        insights.push(card(
            "💡",
            "Top-up suggestion".to_string(),
            format!(
                "Your safe balance is low (€{:.0}). Consider transferring ₹{} (~€200) via Wise for the best rates.",
                safe, inr_needed
            ),
        ));
    }

    let best_time = ctx
        .fx
        .as_ref()
        .map(|f| f.best_time_to_transfer.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Mid-week mornings typically have better rates".to_string());
    insights.push(card(
        "⏰",
        "Best transfer time".to_string(),
        format!("{}. Set a rate alert to catch dips!", best_time),
    ));

    insights
}

fn insights_grocery(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let items = ctx.grocery.as_ref().map(|g| g.items.clone()).unwrap_or_default();
    let grocery_spend: f64 = ctx
        .transactions
        .iter()
        .filter(|t| t.category == "groceries")
        .map(|t| t.amount.abs())
        .sum();
    let daily_budget = ctx.budget.as_ref().map(|b| b.daily_budget).unwrap_or(35.0);

    // Biggest price spread across stores
    let mut spreads = Vec::new();
    for item in &items {
        let prices: Vec<f64> = item.stores.iter().map(|s| s.price).collect();
        if prices.len() >= 2 {
            let max = prices.iter().cloned().fold(f64::MIN, f64::max);
            let min = prices.iter().cloned().fold(f64::MAX, f64::min);
            let diff = max - min;
            if diff > 0.5 {
                if let Some(cheapest) = item.cheapest() {
                    spreads.push((item.name.clone(), diff, cheapest.store.clone(), cheapest.price));
                }
            }
        }
    }
    spreads.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    if let Some((name, diff, store, price)) = spreads.first() {
        insights.push(card(
            "💰",
            format!("Save on {}", name),
            format!(
                "{} varies by €{:.2} across stores. Get it at {} for €{:.2} — cheapest option!",
                name, diff, store, price
            ),
        ));
    }

    if grocery_spend > daily_budget * 3.0 {
        insights.push(card(
            "🛒",
            "Grocery spend is high".to_string(),
            format!(
                "You've spent €{:.2} on groceries recently. Batch cooking on Sundays could save you €15-20/week.",
                grocery_spend
            ),
        ));
    } else {
        insights.push(card(
            "✅",
            "Smart grocery spending".to_string(),
            "Your grocery spending looks well-managed. Keep using price comparisons to maximize savings!"
                .to_string(),
        ));
    }

    let on_sale = items
        .iter()
        .flat_map(|i| i.stores.iter())
        .filter(|s| s.on_sale)
        .count();
    if on_sale > 0 {
        insights.push(card(
            "🏷️",
            format!("{} items on sale", on_sale),
            format!(
                "There are {} items currently on sale. Check the list and stock up on essentials!",
                on_sale
            ),
        ));
    }

    insights
}

fn insights_community(ctx: &UserContext) -> Vec<InsightCard> {
    use crate::models::Intent;
    let mut insights = Vec::new();

    let seeking = ctx.community.iter().filter(|p| p.intent == Intent::Seeking).count();
    let offering = ctx.community.iter().filter(|p| p.intent == Intent::Offering).count();
    let course = ctx
        .user
        .as_ref()
        .map(|u| u.course.clone())
        .unwrap_or_else(|| "your field".to_string());

    insights.push(card(
        "🤝",
        "Community activity".to_string(),
        format!(
            "{} people seeking help, {} offering. Your skills in {} could help someone!",
            seeking, offering, course
        ),
    ));

    if let Some(user) = &ctx.user {
        let area = user
            .location
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        if !area.is_empty() {
            let local = ctx
                .community
                .iter()
                .filter(|p| p.content.to_lowercase().contains(&area))
                .count();
            if local > 0 {
                insights.push(card(
                    "📍",
                    "Posts near you".to_string(),
                    format!(
                        "Found {} posts mentioning your area. Check for nearby sublets, study groups, or deals!",
                        local
                    ),
                ));
            }
        }
    }

    insights.push(card(
        "💡",
        "AI matching active".to_string(),
        "Post what you're looking for and our AI will auto-match you with relevant offers from other students."
            .to_string(),
    ));

    insights
}

fn insights_squad(ctx: &UserContext) -> Vec<InsightCard> {
    use crate::models::Direction;
    let mut insights = Vec::new();

    let owed: Vec<_> = ctx
        .squad_members
        .iter()
        .filter(|m| m.direction == Direction::OwesYou)
        .collect();
    let (total_owed, total_owing) = ctx.squad_totals();

    if total_owed > 0.0 {
        if let Some(biggest) = owed.iter().max_by(|a, b| {
            a.amount.partial_cmp(&b.amount).unwrap_or(std::cmp::Ordering::Equal)
        }) {
            insights.push(card(
                "💸",
                format!("€{:.2} owed to you", total_owed),
                format!(
                    "{} owes €{:.2} for {} ({} days). Send a nudge!",
                    biggest.name, biggest.amount, biggest.reason, biggest.days_since
                ),
            ));
        }
    }

    if total_owing > 0.0 {
        let daily = ctx.budget.as_ref().map(|b| b.daily_budget).unwrap_or(35.0);
        let days_equiv = if daily > 0.0 { total_owing / daily } else { 0.0 };
        insights.push(card(
            "🔴",
            "Settle debts to free budget".to_string(),
            format!(
                "You owe €{:.2} — that's ~{:.1} days of budget. Settling up would improve your runway.",
                total_owing, days_equiv
            ),
        ));
    }

    if total_owed > total_owing {
        insights.push(card(
            "✅",
            "Net positive".to_string(),
            format!(
                "You're net +€{:.2}. Collect your debts to boost your safe-to-spend balance!",
                total_owed - total_owing
            ),
        ));
    }

    if insights.is_empty() {
        insights.push(card(
            "👥",
            "All settled up!".to_string(),
            "No outstanding debts. Next time you split a bill, use the split feature for easy tracking!"
                .to_string(),
        ));
    }

    insights
}

fn insights_perks(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let top_cat = ctx
        .top_category(30)
        .map(|(cat, _)| cat)
        .unwrap_or_else(|| "food".to_string());
    let matched_cat = match top_cat.as_str() {
        "food" | "coffee" => "Food",
        "shopping" => "Shopping",
        "entertainment" => "Entertainment",
        "transport" => "Transport",
        _ => "Food",
    };

    let relevant: Vec<_> = ctx
        .perks
        .iter()
        .filter(|p| p.category == matched_cat && p.is_active)
        .collect();
    if let Some(perk) = relevant.first() {
        insights.push(card(
            "🎯",
            format!("Perfect for your {} spending", top_cat),
            format!(
                "You spend lots on {}. Use {} — {} (code: {})!",
                top_cat,
                perk.brand,
                perk.deal,
                perk.code.as_deref().unwrap_or("N/A")
            ),
        ));
    }

    let hot: Vec<_> = ctx.perks.iter().filter(|p| p.is_hot).collect();
    if let Some(first_hot) = hot.first() {
        insights.push(card(
            "🔥",
            format!("{} hot deals expiring soon", hot.len()),
            format!("Don't miss out! {} has {} right now.", first_hot.brand, first_hot.deal),
        ));
    }

    insights.push(card(
        "💡",
        "Monthly savings potential".to_string(),
        "Using all relevant perks could save you €20-40/month based on your spending patterns."
            .to_string(),
    ));

    insights
}

fn insights_market(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let safe = ctx
        .budget
        .as_ref()
        .map(|b| b.total_balance - b.locked_total())
        .unwrap_or(0.0);

    let cheap = ctx
        .market
        .iter()
        .filter(|l| l.kind == "secondhand" && l.price < 20.0)
        .count();
    if cheap > 0 {
        insights.push(card(
            "🏷️",
            format!("{} items under €20", cheap),
            format!(
                "Found {} affordable secondhand items. Great for stretching your €{:.0} safe balance!",
                cheap, safe
            ),
        ));
    }

    let kits: Vec<_> = ctx.market.iter().filter(|l| l.kind == "starter-kit").collect();
    if !kits.is_empty() {
        let total_saving: f64 = kits
            .iter()
            .filter_map(|l| l.original_price.map(|orig| orig - l.price))
            .sum();
        let avg_saving = total_saving / kits.len() as f64;
        insights.push(card(
            "📦",
            "Starter kit savings".to_string(),
            format!(
                "{} starter kits available — average saving of €{:.0} vs buying new. Perfect for new students!",
                kits.len(),
                avg_saving
            ),
        ));
    }

    let barters = ctx.market.iter().filter(|l| l.kind == "barter").count();
    if barters > 0 {
        let course = ctx
            .user
            .as_ref()
            .map(|u| u.course.clone())
            .unwrap_or_default();
        insights.push(card(
            "🔄",
            "Skill barter opportunity".to_string(),
            format!(
                "As a {} student, you could offer tutoring/coding help. {} barter listings available!",
                course, barters
            ),
        ));
    }

    insights
}

fn insights_streaks(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let current = ctx.streaks.as_ref().map(|s| s.current_streak).unwrap_or(0);
    let milestones = ctx.streaks.as_ref().map(|s| s.milestones.clone()).unwrap_or_default();

    if let Some(next) = milestones.iter().find(|m| !m.achieved && m.days > current) {
        let days_to = next.days - current;
        insights.push(card(
            "🎯",
            format!("{} days to {} {}", days_to, next.emoji, next.label),
            format!("Keep going! You'll unlock '{}' and earn {} coins.", next.reward, next.coins),
        ));
    }

    let incomplete: Vec<_> = ctx.missions.iter().filter(|m| !m.completed).collect();
    if let Some(easiest) = incomplete.iter().min_by_key(|m| m.xp) {
        insights.push(card(
            "⚡",
            "Quick win available".to_string(),
            format!(
                "Complete '{}' for {} coins — easiest mission right now!",
                easiest.title,
                easiest.coin_value()
            ),
        ));
    }

    let completed = ctx.missions.iter().filter(|m| m.completed).count();
    let total_earned = ctx.coins.as_ref().map(|c| c.lifetime).unwrap_or(0);
    insights.push(card(
        "🪙",
        "Coin progress".to_string(),
        format!(
            "You've earned {} lifetime coins from {} missions. Complete more to unlock premium rewards!",
            total_earned, completed
        ),
    ));

    insights
}

fn insights_rewards(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let balance = ctx.coins.as_ref().map(|c| c.balance).unwrap_or(0);
    let affordable: Vec<_> = ctx
        .rewards_shop
        .iter()
        .filter(|r| !r.purchased && r.cost <= balance)
        .collect();
    let almost: Vec<_> = ctx
        .rewards_shop
        .iter()
        .filter(|r| !r.purchased && balance < r.cost && r.cost <= balance + 100)
        .collect();

    if !affordable.is_empty() {
        if let Some(best) = affordable.iter().max_by_key(|r| r.cost) {
            insights.push(card(
                "🛍️",
                format!("{} rewards available!", affordable.len()),
                format!(
                    "You can afford {} rewards. Best value: {} {} ({} coins).",
                    affordable.len(),
                    best.emoji,
                    best.name,
                    best.cost
                ),
            ));
        }
    }

    if let Some(closest) = almost.iter().min_by_key(|r| r.cost - balance) {
        let needed = closest.cost - balance;
        insights.push(card(
            "🎯",
            format!("Just {} coins away!", needed),
            format!(
                "You're only {} coins from '{}'. Complete 1-2 more missions!",
                needed, closest.name
            ),
        ));
    }

    insights.push(card(
        "💡",
        "Smart redemption tip".to_string(),
        "Coupons give the best real-world value. Save coins for food/transport coupons over cosmetic badges!"
            .to_string(),
    ));

    insights
}

fn insights_profile(ctx: &UserContext) -> Vec<InsightCard> {
    let mut insights = Vec::new();

    let daily_budget = ctx.budget.as_ref().map(|b| b.daily_budget).unwrap_or(35.0);
    let spent = ctx.budget.as_ref().map(|b| b.spent_today).unwrap_or(0.0);
    let streak = ctx.streaks.as_ref().map(|s| s.current_streak).unwrap_or(0);
    let stats = ctx.user.as_ref().map(|u| u.stats.clone()).unwrap_or_default();
    let hit_rate = if stats.budget_hit_rate > 0.0 { stats.budget_hit_rate } else { 50.0 };

    let under_budget_bonus = if spent < daily_budget { 40.0 } else { 10.0 };
    let health = (hit_rate * 0.4 + streak.min(30) as f64 * 2.0 + under_budget_bonus).min(100.0) as i64;

    let (grade, msg) = if health >= 80 {
        ("A", "Excellent financial health! You're in the top tier of student budgeters.")
    } else if health >= 60 {
        ("B", "Good financial health. A few tweaks could make you exceptional.")
    } else if health >= 40 {
        ("C", "Average financial health. Focus on streaks and reducing impulse buys.")
    } else {
        ("D", "Needs attention. Let's build better habits — start with a 3-day streak.")
    };

    insights.push(card(
        "📊",
        format!("Financial Health: {} ({}/100)", grade, health),
        msg.to_string(),
    ));

    insights.push(card(
        "🏆",
        format!("€{:.0} saved so far", stats.total_saved),
        format!(
            "You've saved €{:.0} since joining. At this rate, you'll save €{:.0} by semester end!",
            stats.total_saved,
            stats.total_saved * 2.0
        ),
    ));

    let coin_balance = ctx.coins.as_ref().map(|c| c.balance).unwrap_or(0);
    insights.push(card(
        "📅",
        "Monthly recap".to_string(),
        format!(
            "{}-day streak, {} transactions tracked, {} coins earned. Keep growing!",
            streak, stats.transaction_count, coin_balance
        ),
    ));

    insights
}
