use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use eyewear_advisor_common::{Category, FaceShape};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eyewear-advisor")]
#[command(about = "処方度数からのフレーム提案・AIフェイススキャン", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (gemini/offline)
    #[arg(long, default_value = "gemini", global = true)]
    pub ai_provider: AiProvider,

    /// カタログJSONファイル（省略時は設定値、なければ組み込みカタログ）
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 処方度数からフレームを提案
    Suggest {
        /// 処方度数の文字列（例: "SPH -2.75 CYL -0.50 AXIS 180 PD 64"）
        #[arg(long, conflicts_with_all = ["sph", "cyl", "axis", "pd"])]
        rx: Option<String>,

        /// 球面度数 (D)
        #[arg(long, allow_hyphen_values = true)]
        sph: Option<f64>,

        /// 円柱度数 (D)
        #[arg(long, allow_hyphen_values = true)]
        cyl: Option<f64>,

        /// 乱視軸 (0-180)
        #[arg(long, default_value = "0")]
        axis: u16,

        /// 瞳孔間距離 (mm)
        #[arg(long, default_value = "63")]
        pd: u16,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 処方箋画像を読み取り、確認後にフレームを提案
    ScanRx {
        /// 処方箋画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 確認プロンプトを出さずに読み取り値をそのまま使う
        #[arg(short, long)]
        yes: bool,
    },

    /// カタログを表示
    Catalog {
        /// カテゴリで絞り込み (TR/Metal/Acetate/Premium/Kids/Sunglasses)
        #[arg(short, long)]
        category: Option<Category>,

        /// 顔型で絞り込み (oval/round/square/heart/diamond)
        #[arg(short, long)]
        face: Option<FaceShape>,
    },

    /// 顔写真からAIフェイススキャンレポートを作成
    FaceScan {
        /// 顔写真ファイル（省略時は画像なしで解析）
        image: Option<PathBuf>,

        /// キャッシュを使用（同じ画像の再解析をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// 結果をJSONファイルに保存
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// AI相談チャット（空行または /quit で終了）
    Chat {
        /// 1回だけ質問して終了
        #[arg(short, long)]
        message: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggest_with_negative_values() {
        let cli = Cli::try_parse_from(["eyewear-advisor", "suggest", "--sph", "-2.75", "--cyl", "-0.5"]).unwrap();
        match cli.command {
            Commands::Suggest { sph, cyl, axis, pd, .. } => {
                assert_eq!(sph, Some(-2.75));
                assert_eq!(cyl, Some(-0.5));
                assert_eq!(axis, 0);
                assert_eq!(pd, 63);
            }
            _ => panic!("Expected Suggest"),
        }
        assert_eq!(cli.ai_provider, AiProvider::Gemini);
    }

    #[test]
    fn test_rx_conflicts_with_sph() {
        let result = Cli::try_parse_from(["eyewear-advisor", "suggest", "--rx", "SPH -1", "--sph", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rx_conflicts_with_axis_and_pd() {
        assert!(Cli::try_parse_from(["eyewear-advisor", "suggest", "--rx", "SPH -1", "--axis", "90"]).is_err());
        assert!(Cli::try_parse_from(["eyewear-advisor", "suggest", "--rx", "SPH -1", "--pd", "60"]).is_err());

        // 既定値のままなら衝突しない
        let cli = Cli::try_parse_from(["eyewear-advisor", "suggest", "--rx", "SPH -1 AXIS 90"]).unwrap();
        assert!(matches!(cli.command, Commands::Suggest { rx: Some(_), .. }));
    }

    #[test]
    fn test_parse_catalog_filters() {
        let cli = Cli::try_parse_from([
            "eyewear-advisor", "catalog", "--category", "premium", "--face", "oval", "--ai-provider", "offline",
        ])
        .unwrap();
        match cli.command {
            Commands::Catalog { category, face } => {
                assert_eq!(category, Some(Category::Premium));
                assert_eq!(face, Some(FaceShape::Oval));
            }
            _ => panic!("Expected Catalog"),
        }
        assert_eq!(cli.ai_provider, AiProvider::Offline);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = Cli::try_parse_from(["eyewear-advisor", "catalog", "--category", "plastic"]);
        assert!(result.is_err());
    }
}
