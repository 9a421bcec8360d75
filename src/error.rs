use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`eyewear-advisor config --set-api-key YOUR_KEY` または環境変数 GEMINI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像サイズが上限を超えています: {0} bytes（上限 5MB）")]
    ImageTooLarge(u64),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("処方度数の入力が不正: {0}")]
    InvalidPrescription(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Common(#[from] eyewear_advisor_common::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
