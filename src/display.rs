//! 表示用の整形
//!
//! - Base64画像 → data URI（MIMEはデコードした先頭バイトから判定）
//! - 金額・日時・一覧表

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use plant_admin_common::{Category, Item, Order, Resource, Worker};

/// 画像が無い商品の代替画像
pub const PLACEHOLDER_IMAGE: &str = "/images/product.png";

const DATA_URI_PREFIX: &str = "data:image";

/// バイト列からMIMEタイプを推定（不明ならJPEG）
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        _ => "image/jpeg",
    }
}

/// バイト列をdata URIにする
pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(bytes), STANDARD.encode(bytes))
}

/// APIが返す画像値を表示用のsrcに変換
///
/// - `data:image...` はそのまま
/// - 接頭辞なしのBase64は判定したMIMEの接頭辞を付ける
/// - 空なら代替画像
pub fn image_src(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return PLACEHOLDER_IMAGE.to_string(),
    };
    if raw.starts_with(DATA_URI_PREFIX) {
        return raw.to_string();
    }
    // 先頭数バイト分だけデコードして判定する
    let take = raw.len().min(64) / 4 * 4;
    let mime = raw
        .get(..take)
        .and_then(|head| STANDARD.decode(head).ok())
        .map(|bytes| sniff_mime(&bytes))
        .unwrap_or("image/jpeg");
    format!("data:{};base64,{}", mime, raw)
}

pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// 一覧表の1行
pub trait TableRow: Resource {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for Item {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Quantity", "Price", "Category"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.item_id.to_string(),
            self.name.clone(),
            self.description.clone().filter(|d| !d.is_empty()).unwrap_or_else(|| "-".into()),
            self.quantity.to_string(),
            money(self.price),
            self.category.clone().unwrap_or_default(),
        ]
    }
}

impl TableRow for Category {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Image"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
            if self.image_base64.as_deref().is_some_and(|i| !i.is_empty()) { "yes" } else { "no" }.into(),
        ]
    }
}

impl TableRow for Order {
    fn headers() -> &'static [&'static str] {
        &["Order ID", "Customer", "Email", "Date", "Total", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            format!("#{}", self.id),
            self.customer_name(),
            self.email.clone(),
            plant_admin_common::timestamp::display_optional(self.order_date.as_ref()),
            money(self.order_total),
            self.status.to_string(),
        ]
    }
}

impl TableRow for Worker {
    fn headers() -> &'static [&'static str] {
        &["Worker ID", "Email", "Contact", "Address", "Joined"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.email.clone(),
            self.contact_no.clone().unwrap_or_default(),
            self.address.clone().unwrap_or_default().replace('\n', ", "),
            plant_admin_common::timestamp::display_optional(self.djoined.as_ref()),
        ]
    }
}

/// 列幅を揃えた表を文字列にする
pub fn render_table<R: TableRow>(rows: &[&R]) -> String {
    let headers = R::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    for row in &cells {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}
