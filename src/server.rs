use std::path::Path;
use std::sync::Arc;
use std::{fs, io};

use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::info;

use crate::config::Config;
use crate::paginator::Paginator;
use crate::post::{Post, PostSummary};
use crate::post_query::{self, ListQuery, SortBy};
use crate::post_render::render_markdown;
use crate::post_store::PostStore;
use crate::query_string::QueryString;
use crate::view::index_renderer::IndexRenderer;
use crate::view::list_renderer::ListRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::rss_renderer::RssChannel;

struct AppState {
    store: PostStore,
    config: Config,
}

fn read_template(tpl_dir: &Path, file_name: &str) -> io::Result<String> {
    fs::read_to_string(tpl_dir.join(file_name))
}

/// Every page performs its own full read of the store. Content only
/// changes between restarts, so there is nothing to invalidate.
fn load_summaries(store: &PostStore) -> Vec<PostSummary> {
    store.list_all().iter().map(Post::summary).collect()
}

fn render_index_page(state: &AppState) -> io::Result<String> {
    let template_src = read_template(&state.config.paths.template_dir, "index.tpl")?;
    let renderer = IndexRenderer::new(&template_src)?;

    let site = &state.config.site;
    let post_count = state.store.list_all().len();
    Ok(renderer.render(&site.title, &site.description, post_count))
}

fn render_list_page(state: &AppState, query: &ListQuery) -> io::Result<String> {
    let summaries = load_summaries(&state.store);
    let listing = post_query::run(
        &summaries,
        query,
        state.config.defaults.page_size,
        &state.config.defaults.featured_tags,
    );

    let template_src = read_template(&state.config.paths.template_dir, "postlist.tpl")?;
    let renderer = ListRenderer::new(&template_src)?;
    Ok(renderer.render(&listing.posts, &listing.page_info, &listing.tags, query.tag.as_deref()))
}

fn render_view_page(state: &AppState, post: &Post) -> io::Result<String> {
    let body_html = render_markdown(&post.content)?;
    let template_src = read_template(&state.config.paths.template_dir, "view.tpl")?;
    let renderer = PostRenderer::new(&template_src)?;
    Ok(renderer.render(post, &body_html))
}

fn not_found_page(state: &AppState) -> web::HttpResponse {
    let body = read_template(&state.config.paths.template_dir, "notfound.tpl")
        .unwrap_or_else(|_| "Nothing here.".to_string());

    web::HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[web::get("/")]
async fn index(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match render_index_page(&state) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering index: {}", e)),
    }
}

#[web::get("/blog")]
async fn blog_list(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let qs = QueryString::from(req.uri().query().unwrap_or(""));
    let query = ListQuery {
        page: qs.get_page(),
        tag: qs.get_tag(),
        sort: qs.get_sort(),
    };

    match render_list_page(&state, &query) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error listing posts: {}", e)),
    }
}

// Begin: Redirect region --------
#[web::get("/blog/{post}")]
async fn view_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", path.into_inner() + "/")
        .content_type("text/html; charset=utf-8")
        .finish()
}
// End: Redirect region --------

#[web::get("/blog/{post}/")]
async fn blog_view(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let slug = path.into_inner();

    let post = match state.store.get(&slug) {
        Some(post) => post,
        None => return not_found_page(&state),
    };

    // Pointer posts live off-site; there is no body to render
    if let Some(ref url) = post.external_url {
        return web::HttpResponse::TemporaryRedirect()
            .header("Location", url.as_str())
            .finish();
    }

    match render_view_page(&state, &post) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error loading post {}: {}", slug, e)),
    }
}

#[web::get("/rss")]
async fn rss_feed(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let summaries = load_summaries(&state.store);
    let sorted = post_query::sort_posts(&summaries, SortBy::Recent);

    let page_size = match state.config.rss_feed {
        Some(ref rss) => rss.page_size,
        None => state.config.defaults.page_size,
    };
    let paginator = Paginator::from(&sorted, page_size);
    let (page, _) = paginator.get_page(1);

    let site = &state.config.site;
    let channel = RssChannel {
        ch_title: &site.title,
        ch_link: &site.url,
        ch_desc: &site.description,
    };

    match channel.render(page) {
        Ok(xml) => web::HttpResponse::Ok()
            .content_type("application/rss+xml; charset=utf-8")
            .body(xml),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering feed: {}", e)),
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

async fn not_found(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    not_found_page(&state)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let store = PostStore::new(config.paths.posts_dir.clone());
    info!("Serving {} posts from {}", store.list_all().len(), config.paths.posts_dir.display());

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState { store, config });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(public_files)
            .service(blog_list)
            .service(blog_view)
            .service(view_wo_slash)
            .service(rss_feed)
            .default_service(web::route().to(not_found))
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
