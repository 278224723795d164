use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ActionResponse, ActivityEntry, Direction, NudgeRequest, SettleRequest, SettleResponse,
    SplitExpenseRequest, SplitResponse, SquadMember, SquadResponse,
};
use crate::routes::{not_found, store_error, validation_error, AppState};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/squad", web::get().to(get_squad))
        .route("/squad/split", web::post().to(split_expense))
        .route("/squad/nudge", web::post().to(nudge_member))
        .route("/squad/settle", web::post().to(settle_debt));
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn get_squad(state: web::Data<AppState>) -> impl Responder {
    let members: Vec<SquadMember> = match state.store.load(Document::SquadMembers) {
        Ok(m) => m,
        Err(e) => return store_error("Failed to load squad members", e),
    };
    let activity: Vec<ActivityEntry> = match state.store.load(Document::SquadActivity) {
        Ok(a) => a,
        Err(e) => return store_error("Failed to load squad activity", e),
    };

    HttpResponse::Ok().json(SquadResponse { members, activity })
}

/// Apply a split share to one member's running balance.
///
/// When the user paid, a member who owed them gains debt; a member the user
/// owed has their credit consumed first, flipping direction at zero.
fn apply_split_share(member: &mut SquadMember, per_person: f64, description: &str) {
    if member.direction == Direction::YouOwe {
        member.amount = (member.amount - per_person).max(0.0);
        if member.amount == 0.0 {
            member.direction = Direction::OwesYou;
        }
    } else {
        member.direction = Direction::OwesYou;
        member.amount += per_person;
    }
    member.reason = format!("{} (split)", description);
    member.days_since = 0;
}

async fn split_expense(
    state: web::Data<AppState>,
    req: web::Json<SplitExpenseRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut members: Vec<SquadMember> = match state.store.load(Document::SquadMembers) {
        Ok(m) => m,
        Err(e) => return store_error("Failed to load squad members", e),
    };
    let mut activity: Vec<ActivityEntry> = match state.store.load(Document::SquadActivity) {
        Ok(a) => a,
        Err(e) => return store_error("Failed to load squad activity", e),
    };

    // +1 for the user themselves
    let total_people = req.member_ids.len() + 1;
    let per_person = round2(req.total_amount / total_people as f64);

    if req.paid_by == "you" {
        for member in members.iter_mut().filter(|m| req.member_ids.contains(&m.id)) {
            apply_split_share(member, per_person, &req.description);
        }
    }

    let entry = ActivityEntry::now(
        "✂️",
        format!(
            "New split: {} — €{:.2} total (€{:.2} each)",
            req.description, req.total_amount, per_person
        ),
    );
    activity.insert(0, entry.clone());

    if let Err(e) = state.store.save(Document::SquadMembers, &members) {
        return store_error("Failed to save squad members", e);
    }
    if let Err(e) = state.store.save(Document::SquadActivity, &activity) {
        return store_error("Failed to save squad activity", e);
    }

    HttpResponse::Ok().json(SplitResponse {
        success: true,
        per_person,
        total_people,
        activity: entry,
    })
}

async fn nudge_member(
    state: web::Data<AppState>,
    req: web::Json<NudgeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let members: Vec<SquadMember> = match state.store.load(Document::SquadMembers) {
        Ok(m) => m,
        Err(e) => return store_error("Failed to load squad members", e),
    };
    let mut activity: Vec<ActivityEntry> = match state.store.load(Document::SquadActivity) {
        Ok(a) => a,
        Err(e) => return store_error("Failed to load squad activity", e),
    };

    let Some(member) = members.iter().find(|m| m.id == req.member_id) else {
        return not_found("Member not found");
    };

    let entry = ActivityEntry::now(
        "👆",
        format!("You sent a nudge to {} for €{:.2}", member.name, member.amount),
    );
    activity.insert(0, entry);

    if let Err(e) = state.store.save(Document::SquadActivity, &activity) {
        return store_error("Failed to save squad activity", e);
    }

    HttpResponse::Ok().json(ActionResponse {
        success: true,
        message: format!("Nudge sent to {}!", member.name),
    })
}

async fn settle_debt(
    state: web::Data<AppState>,
    req: web::Json<SettleRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut members: Vec<SquadMember> = match state.store.load(Document::SquadMembers) {
        Ok(m) => m,
        Err(e) => return store_error("Failed to load squad members", e),
    };
    let mut activity: Vec<ActivityEntry> = match state.store.load(Document::SquadActivity) {
        Ok(a) => a,
        Err(e) => return store_error("Failed to load squad activity", e),
    };

    let Some(member) = members.iter_mut().find(|m| m.id == req.member_id) else {
        return not_found("Member not found");
    };

    let prev_direction = member.direction;
    // Amount 0 settles the whole balance
    let settle_amount = if req.amount > 0.0 { req.amount } else { member.amount };
    member.amount = (member.amount - settle_amount).max(0.0);
    if member.amount == 0.0 {
        member.direction = Direction::Settled;
    }
    member.days_since = 0;

    let (emoji, text) = if prev_direction == Direction::YouOwe {
        ("💸", format!("You paid €{:.2}", settle_amount))
    } else {
        ("✅", format!("{} paid you €{:.2}", member.name, settle_amount))
    };
    activity.insert(0, ActivityEntry::now(emoji, text));

    let remaining = member.amount;

    if let Err(e) = state.store.save(Document::SquadMembers, &members) {
        return store_error("Failed to save squad members", e);
    }
    if let Err(e) = state.store.save(Document::SquadActivity, &activity) {
        return store_error("Failed to save squad activity", e);
    }

    HttpResponse::Ok().json(SettleResponse { success: true, remaining })
}
