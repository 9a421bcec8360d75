use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AiProvider {
    /// Gemini API（失敗時は固定の代替応答）
    Gemini,
    /// ネットワークを使わず固定の代替応答のみ
    Offline,
}

