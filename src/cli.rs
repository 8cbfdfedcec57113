use clap::{Args, Parser, Subcommand};
use plant_admin_common::OrderStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plant-admin")]
#[command(about = "植物ストア管理コンソール（商品・カテゴリ・注文・スタッフ）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 商品の管理
    Items {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// カテゴリの管理
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// 注文の管理
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// スタッフの管理
    Workers {
        #[command(subcommand)]
        action: WorkerAction,
    },

    /// ログイン状態
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// 設定を表示/編集
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 一覧の検索条件
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// 検索語（大文字小文字を区別しない部分一致）
    #[arg(short, long)]
    pub search: Option<String>,
}

/// 削除の確認
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DeleteArgs {
    /// 確認せずに削除
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// 商品一覧
    List(ListArgs),

    /// 商品の詳細
    Show { id: String },

    /// 商品を追加
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: String,

        #[arg(long)]
        quantity: String,

        #[arg(long)]
        description: Option<String>,

        /// カテゴリ名（`categories names` で一覧）
        #[arg(long)]
        category: Option<String>,

        /// 商品画像ファイル
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// 商品を削除
    Delete {
        id: String,

        #[command(flatten)]
        confirm: DeleteArgs,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// カテゴリ一覧
    List(ListArgs),

    /// カテゴリの詳細
    Show { id: String },

    /// カテゴリ名のみ
    Names,

    /// カテゴリを追加
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// カテゴリを更新（省略した項目は現在の値のまま）
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// 新しい画像（省略時は既存画像を保持）
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// カテゴリを削除
    Delete {
        id: String,

        #[command(flatten)]
        confirm: DeleteArgs,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// 注文一覧
    List(ListArgs),

    /// 注文の詳細（明細付き）
    Show { id: String },

    /// ステータスを変更 (PENDING/PROCESSING/SHIPPED/DELIVERED/CANCELLED)
    SetStatus { id: String, status: OrderStatus },
}

#[derive(Subcommand)]
pub enum WorkerAction {
    /// スタッフ一覧
    List(ListArgs),

    /// スタッフを削除
    Delete {
        id: String,

        #[command(flatten)]
        confirm: DeleteArgs,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// ログイン状態にする
    Login {
        /// 管理者名
        #[arg(long)]
        admin: String,
    },

    /// ログアウト
    Logout,

    /// 現在の状態
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_status() {
        let cli = Cli::try_parse_from(["plant-admin", "orders", "set-status", "7", "shipped"]).unwrap();
        match cli.command {
            Commands::Orders {
                action: OrderAction::SetStatus { id, status },
            } => {
                assert_eq!(id, "7");
                assert_eq!(status, OrderStatus::Shipped);
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_parse_delete_yes() {
        let cli = Cli::try_parse_from(["plant-admin", "-v", "workers", "delete", "3", "--yes"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Workers {
                action: WorkerAction::Delete { confirm: DeleteArgs { yes: true }, .. }
            }
        ));
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(Cli::try_parse_from(["plant-admin", "orders", "set-status", "7", "LOST"]).is_err());
    }
}
