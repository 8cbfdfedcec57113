//! サブコマンドの実行
//!
//! 各コマンドはログイン済みセッションで画面をマウントし、コントローラ経由で
//! 操作する（クライアントを直接叩くのは詳細表示だけ）。

use crate::cli::{CategoryAction, Commands, DeleteArgs, ItemAction, ListArgs, OrderAction, SessionAction, WorkerAction};
use crate::client::{ApiContext, HttpResourceClient, ResourceClient};
use crate::config::Config;
use crate::controller::{FormOutcome, FormWorkflow, ListState, StatusWorkflow};
use crate::display::{self, TableRow};
use crate::page::ResourcePage;
use crate::session::{FileSession, SessionContext};
use anyhow::{anyhow, bail, Context, Result};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use plant_admin_common::{timestamp, Category, ImageUpload, Item, Order, RecordId, Resource, ResourceKind, Worker};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Session { action } => session(action),
        Commands::Config { set_backend_url, show } => config(set_backend_url, show),
        Commands::Items { action } => items(connect()?, action).await,
        Commands::Categories { action } => categories(connect()?, action).await,
        Commands::Orders { action } => orders(connect()?, action).await,
        Commands::Workers { action } => workers(connect()?, action).await,
    }
}

/// 接続情報とログイン済みセッション
struct Env {
    ctx: ApiContext,
    session: FileSession,
}

impl Env {
    fn client<R: Resource>(&self) -> Arc<HttpResourceClient<R>> {
        Arc::new(HttpResourceClient::new(self.ctx.clone()))
    }

    /// ログイン済みなら画面をマウントする
    fn mount<R: Resource>(&self) -> Result<ResourcePage<R, HttpResourceClient<R>>> {
        Ok(ResourcePage::<R, HttpResourceClient<R>>::mount(&self.session, self.client::<R>())?)
    }

    /// 画面を開いて最初の一覧を取得する（取得中はスピナー表示）
    async fn open<R: Resource>(&self) -> Result<ResourcePage<R, HttpResourceClient<R>>> {
        let mut page = self.mount::<R>()?;

        let spinner = spinner(&format!("{}を取得中...", kind_label(R::KIND)));
        page.refresh().await;
        spinner.finish_and_clear();

        if let ListState::Error(message) = page.state() {
            bail!("{}", message);
        }
        Ok(page)
    }
}

fn connect() -> Result<Env> {
    let config = Config::load()?;
    let base_url = config.backend_url()?;
    tracing::debug!(%base_url, "Using backend");

    Ok(Env {
        ctx: ApiContext::new(base_url, config.timeout())?,
        session: FileSession::open()?,
    })
}

/// 画面に出すリソース名
fn kind_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Item => "商品",
        ResourceKind::Category => "カテゴリ",
        ResourceKind::Order => "注文",
        ResourceKind::Worker => "スタッフ",
    }
}

fn delete_prompt(kind: ResourceKind, id: &RecordId) -> String {
    format!("{} {} を削除しますか？", kind_label(kind), id)
}

fn deleted_message(kind: ResourceKind) -> String {
    format!("{}を削除しました", kind_label(kind))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn print_list<R: TableRow>(env: &Env, args: ListArgs) -> Result<()> {
    let mut page = env.open::<R>().await?;
    if let Some(term) = args.search {
        page.set_search_term(term);
    }

    let rows = page.filtered();
    if rows.is_empty() {
        println!("{}はありません", kind_label(R::KIND));
    } else {
        println!("{}", display::render_table(&rows));
        println!("\n{} / {}件", rows.len(), page.collection().len());
    }
    Ok(())
}

async fn delete<R: Resource>(env: &Env, id: &str, confirm: DeleteArgs) -> Result<()> {
    let id = RecordId::parse(id);
    let mut page = env.open::<R>().await?;
    if page.find(&id).is_none() {
        bail!("{} {} が見つかりません", kind_label(R::KIND), id);
    }

    if !confirm.yes {
        let accepted = Confirm::new()
            .with_prompt(delete_prompt(R::KIND, &id))
            .default(false)
            .interact()
            .context("確認入力に失敗しました")?;
        if !accepted {
            println!("中止しました");
            return Ok(());
        }
    }

    match page.remove(&id).await {
        Ok(message) => {
            println!("✔ {}", message.unwrap_or_else(|| deleted_message(R::KIND)));
            Ok(())
        }
        Err(message) => Err(anyhow!(message)),
    }
}

fn load_image(path: &Path) -> Result<ImageUpload> {
    let bytes = std::fs::read(path).with_context(|| format!("画像を読み込めません: {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(ImageUpload {
        file_name,
        mime: display::sniff_mime(&bytes).to_string(),
        bytes,
    })
}

fn report(outcome: FormOutcome, default_message: &str) -> Result<()> {
    match outcome {
        FormOutcome::Succeeded { message } => {
            println!("✔ {}", message.unwrap_or_else(|| default_message.to_string()));
            Ok(())
        }
        FormOutcome::Invalid(m) | FormOutcome::Rejected(m) | FormOutcome::TransportFailed(m) => Err(anyhow!(m)),
        FormOutcome::Busy => Err(anyhow!("送信中です")),
    }
}

// ---- 商品 ----

async fn items(env: Env, action: ItemAction) -> Result<()> {
    match action {
        ItemAction::List(args) => print_list::<Item>(&env, args).await,
        ItemAction::Show { id } => {
            let page = env.mount::<Item>()?;
            let item = page
                .client()
                .get_by_id(&RecordId::parse(&id))
                .await
                .map_err(|e| anyhow!(e))?;
            print_item(&item);
            Ok(())
        }
        ItemAction::Add { name, price, quantity, description, category, image } => {
            let mut page = env.open::<Item>().await?;
            let mut form = FormWorkflow::<Item>::open_create().ok_or_else(|| anyhow!("商品は追加できません"))?;
            form.set_field("name", name);
            form.set_field("price", price);
            form.set_field("quantity", quantity);
            form.set_field("description", description.unwrap_or_default());
            form.set_field("category", category.unwrap_or_default());
            if let Some(path) = image {
                form.select_image(load_image(&path)?);
            }

            let client = page.client().clone();
            let outcome = form.submit(client.as_ref(), Some(page.list_mut())).await;
            report(outcome, "商品を追加しました")
        }
        ItemAction::Delete { id, confirm } => delete::<Item>(&env, &id, confirm).await,
    }
}

fn print_item(item: &Item) {
    println!("#{} {}", item.item_id, item.name);
    println!("  価格:     {}", display::money(item.price));
    println!("  在庫:     {}", item.quantity);
    println!("  カテゴリ: {}", item.category.as_deref().unwrap_or("-"));
    println!("  説明:     {}", item.description.as_deref().unwrap_or("-"));
    let image = display::image_src(item.image.as_deref());
    println!("  画像:     {}", if image == display::PLACEHOLDER_IMAGE { image.as_str() } else { "(埋め込み)" });
}

// ---- カテゴリ ----

async fn categories(env: Env, action: CategoryAction) -> Result<()> {
    match action {
        CategoryAction::List(args) => print_list::<Category>(&env, args).await,
        CategoryAction::Show { id } => {
            let page = env.mount::<Category>()?;
            let category = page
                .client()
                .get_by_id(&RecordId::parse(&id))
                .await
                .map_err(|e| anyhow!(e))?;
            let rows = [&category];
            println!("{}", display::render_table(&rows));
            Ok(())
        }
        CategoryAction::Names => {
            let page = env.mount::<Category>()?;
            let names = page.client().names().await.map_err(|e| anyhow!(e))?;
            for name in names {
                println!("{}", name);
            }
            Ok(())
        }
        CategoryAction::Add { name, description, image } => {
            let mut page = env.open::<Category>().await?;
            let mut form =
                FormWorkflow::<Category>::open_create().ok_or_else(|| anyhow!("カテゴリは追加できません"))?;
            form.set_field("name", name);
            form.set_field("description", description.unwrap_or_default());
            if let Some(path) = image {
                form.select_image(load_image(&path)?);
            }

            let client = page.client().clone();
            let outcome = form.submit(client.as_ref(), Some(page.list_mut())).await;
            report(outcome, "カテゴリを追加しました")
        }
        CategoryAction::Update { id, name, description, image } => {
            let mut page = env.open::<Category>().await?;
            let id = RecordId::parse(&id);
            let current = page
                .find(&id)
                .cloned()
                .ok_or_else(|| anyhow!("カテゴリ {} が見つかりません", id))?;

            let mut form =
                FormWorkflow::open_update(&current).ok_or_else(|| anyhow!("カテゴリは更新できません"))?;
            if let Some(name) = name {
                form.set_field("name", name);
            }
            if let Some(description) = description {
                form.set_field("description", description);
            }
            if let Some(path) = image {
                form.select_image(load_image(&path)?);
            }

            let client = page.client().clone();
            let outcome = form.submit(client.as_ref(), Some(page.list_mut())).await;
            report(outcome, "カテゴリを更新しました")
        }
        CategoryAction::Delete { id, confirm } => delete::<Category>(&env, &id, confirm).await,
    }
}

// ---- 注文 ----

async fn orders(env: Env, action: OrderAction) -> Result<()> {
    match action {
        OrderAction::List(args) => print_list::<Order>(&env, args).await,
        OrderAction::Show { id } => {
            let page = env.mount::<Order>()?;
            let mut workflow = StatusWorkflow::new();
            let order = workflow
                .view_order(page.client().as_ref(), &RecordId::parse(&id))
                .await
                .map_err(|e| anyhow!(e))?;
            print_order(order);
            Ok(())
        }
        OrderAction::SetStatus { id, status } => {
            let mut page = env.open::<Order>().await?;
            let id = RecordId::parse(&id);
            let mut workflow = StatusWorkflow::new();
            workflow
                .update_status(page.list_mut(), &id, status)
                .await
                .map_err(|m| anyhow!(m))?;

            println!("✔ 注文 #{} のステータスを {} に変更しました", id, status);
            if let Some(order) = page.find(&id) {
                println!("{}", display::render_table(&[order]));
            }
            Ok(())
        }
    }
}

fn print_order(order: &Order) {
    println!("注文 #{}  [{}]", order.id, order.status);
    println!("  顧客:     {} <{}>", order.customer_name(), order.email);
    if let Some(contact) = &order.contact_no {
        println!("  連絡先:   {}", contact);
    }
    let address: Vec<&str> = [&order.street, &order.city, &order.state, &order.zip_code]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect();
    if !address.is_empty() {
        println!("  配送先:   {}", address.join(", "));
    }
    println!("  注文日:   {}", timestamp::display_optional(order.order_date.as_ref()));

    println!();
    for line in &order.items {
        println!(
            "  {:<30} {:>3} x {:>10} = {:>10}",
            line.item_name,
            line.quantity,
            display::money(line.price),
            display::money(line.total_price)
        );
    }
    println!();
    println!("  小計:     {}", display::money(order.items_total));
    println!("  送料:     {}", display::money(order.shipping_charges));
    println!("  合計:     {}", display::money(order.order_total));
}

// ---- スタッフ ----

async fn workers(env: Env, action: WorkerAction) -> Result<()> {
    match action {
        WorkerAction::List(args) => print_list::<Worker>(&env, args).await,
        WorkerAction::Delete { id, confirm } => delete::<Worker>(&env, &id, confirm).await,
    }
}

// ---- セッション・設定 ----

fn session(action: SessionAction) -> Result<()> {
    let session = FileSession::open()?;
    match action {
        SessionAction::Login { admin } => {
            session.login(&admin)?;
            println!("✔ {} としてログインしました", admin);
        }
        SessionAction::Logout => {
            session.logout();
            println!("✔ ログアウトしました");
        }
        SessionAction::Status => {
            let state = session.state();
            match (state.is_authenticated, state.admin) {
                (true, Some(admin)) => println!("ログイン中: {}", admin),
                (true, None) => println!("ログイン中"),
                (false, _) => println!("未ログイン"),
            }
        }
    }
    Ok(())
}

fn config(set_backend_url: Option<String>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = set_backend_url {
        config.set_backend_url(url)?;
        println!("✔ バックエンドURLを保存しました");
    }

    if show {
        println!("設定ファイル: {}", Config::config_path()?.display());
        match config.backend_url() {
            Ok(url) => println!("バックエンドURL: {}", url),
            Err(_) => println!("バックエンドURL: (未設定)"),
        }
        println!("タイムアウト: {}秒", config.timeout_seconds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_wording() {
        assert_eq!(delete_prompt(ResourceKind::Item, &RecordId::Int(7)), "商品 7 を削除しますか？");
        assert_eq!(deleted_message(ResourceKind::Worker), "スタッフを削除しました");
        assert_eq!(kind_label(ResourceKind::Category), "カテゴリ");
    }
}
