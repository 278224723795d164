use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use serde::Deserialize;
use validator::Validate;

use crate::core::matchmaker::{announcement, comment_body};
use crate::core::{auto_tags, detect_intent, merge_tags};
use crate::models::{
    initials_avatar, Comment, Intent, NewCommentRequest, NewPostRequest, Post, VoteRequest,
    VoteResponse,
};
use crate::routes::{not_found, store_error, validation_error, AppState};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/community", web::get().to(get_community))
        .route("/community", web::post().to(create_post))
        .route("/community/{id}/comment", web::post().to(add_comment))
        .route("/community/{id}/vote", web::post().to(vote_post));
}

#[derive(Debug, Deserialize)]
struct CommunityQuery {
    intent: Option<String>,
}

async fn get_community(
    state: web::Data<AppState>,
    query: web::Query<CommunityQuery>,
) -> impl Responder {
    let posts: Vec<Post> = match state.store.load(Document::CommunityPosts) {
        Ok(p) => p,
        Err(e) => return store_error("Failed to load community posts", e),
    };

    let filtered: Vec<Post> = match query.intent.as_deref() {
        Some(intent) if intent != "All" => {
            posts.into_iter().filter(|p| p.intent.as_str() == intent).collect()
        }
        _ => posts,
    };

    HttpResponse::Ok().json(filtered)
}

fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<NewPostRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut posts: Vec<Post> = match state.store.load(Document::CommunityPosts) {
        Ok(p) => p,
        Err(e) => return store_error("Failed to load community posts", e),
    };

    // A client-supplied intent wins; GENERAL defers to detection
    let final_intent = if req.intent != Intent::General {
        req.intent
    } else {
        detect_intent(&req.content)
    };

    let merged_tags = merge_tags(&req.tags, auto_tags(&req.content));

    let mut new_post = Post {
        id: format!("cp-{}", &uuid::Uuid::new_v4().simple().to_string()[..6]),
        author: req.author.clone(),
        avatar: initials_avatar(&req.author),
        content: req.content.clone(),
        tags: merged_tags,
        intent: final_intent,
        ai_match: None,
        upvotes: 0,
        comments: vec![],
        created_at: now_iso(),
    };

    if let Some(best) = state.matchmaker.best_match(&new_post, &posts) {
        let match_text = announcement(&new_post, best.post);
        tracing::info!(
            "Matched post {} with {} (score {:.1})",
            new_post.id,
            best.post.id,
            best.score
        );
        new_post.comments.push(Comment {
            id: format!("cc-ai-{}", &uuid::Uuid::new_v4().simple().to_string()[..6]),
            author: "Stash AI".to_string(),
            avatar: "🤖".to_string(),
            content: comment_body(&new_post.content, &match_text),
            is_ai: true,
            created_at: now_iso(),
        });
        new_post.ai_match = Some(match_text);
    }

    posts.insert(0, new_post.clone());
    if let Err(e) = state.store.save(Document::CommunityPosts, &posts) {
        return store_error("Failed to save community posts", e);
    }

    HttpResponse::Ok().json(new_post)
}

async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<NewCommentRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let post_id = path.into_inner();
    let mut posts: Vec<Post> = match state.store.load(Document::CommunityPosts) {
        Ok(p) => p,
        Err(e) => return store_error("Failed to load community posts", e),
    };

    let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
        return not_found("Post not found");
    };

    let new_comment = Comment {
        id: format!("cc-{}", &uuid::Uuid::new_v4().simple().to_string()[..6]),
        author: req.author.clone(),
        avatar: initials_avatar(&req.author),
        content: req.content.clone(),
        is_ai: false,
        created_at: now_iso(),
    };
    post.comments.push(new_comment.clone());

    if let Err(e) = state.store.save(Document::CommunityPosts, &posts) {
        return store_error("Failed to save community posts", e);
    }

    HttpResponse::Ok().json(new_comment)
}

async fn vote_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<VoteRequest>,
) -> impl Responder {
    let post_id = path.into_inner();
    let mut posts: Vec<Post> = match state.store.load(Document::CommunityPosts) {
        Ok(p) => p,
        Err(e) => return store_error("Failed to load community posts", e),
    };

    let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
        return not_found("Post not found");
    };

    if req.direction == "up" {
        post.upvotes += 1;
    } else {
        post.upvotes = post.upvotes.saturating_sub(1);
    }
    let upvotes = post.upvotes;

    if let Err(e) = state.store.save(Document::CommunityPosts, &posts) {
        return store_error("Failed to save community posts", e);
    }

    HttpResponse::Ok().json(VoteResponse { upvotes })
}
