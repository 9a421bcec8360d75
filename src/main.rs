use clap::Parser;
use eyewear_advisor::advisor::{build_advisor, Origin, StyleAdvisor};
use eyewear_advisor::cache::{snapshot_hash, CacheFile};
use eyewear_advisor::cli::{Cli, Commands};
use eyewear_advisor::config::Config;
use eyewear_advisor::error::Result;
use eyewear_advisor::output::{self, SuggestionOutput};
use eyewear_advisor::prescription::{parse_prescription_text, review_interactive};
use eyewear_advisor::snapshot::{FileSnapshotSource, SnapshotSource};
use eyewear_advisor_common::{recommend_with, ChatMessage, PrescriptionProfile};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "eyewear_advisor=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Suggest { rx, sph, cyl, axis, pd, json } => {
            let profile = match rx {
                Some(text) => parse_prescription_text(&text)?,
                None => PrescriptionProfile::new(sph.unwrap_or(0.0), cyl.unwrap_or(0.0), axis, pd),
            };
            if profile.axis > PrescriptionProfile::MAX_AXIS {
                return Err(eyewear_advisor::error::AdvisorError::InvalidPrescription(format!(
                    "AXIS は 0〜180 で指定してください: {}",
                    profile.axis
                )));
            }

            let catalog = config.load_catalog(cli.catalog.as_deref())?;
            let rec = recommend_with(&profile, catalog.items(), &config.thresholds);

            if json {
                println!("{}", serde_json::to_string_pretty(&SuggestionOutput::new(&profile, &rec))?);
            } else {
                println!("👓 eyewear-advisor - フレーム提案\n");
                println!("{}", output::format_recommendation(&profile, &rec));
            }
        }

        Commands::ScanRx { image, yes } => {
            println!("🔍 eyewear-advisor - 処方箋読み取り\n");

            let catalog = config.load_catalog(cli.catalog.as_deref())?;
            let advisor = build_advisor(cli.ai_provider, &config, &catalog)?;

            let snapshot = FileSnapshotSource::new(&image, config.max_image_size).capture()?;

            let pb = output::spinner("処方箋を読み取り中...");
            let profile = advisor.read_prescription(&snapshot).await?;
            pb.finish_and_clear();

            let profile = if yes { profile } else { review_interactive(profile)? };
            let rec = recommend_with(&profile, catalog.items(), &config.thresholds);

            println!();
            println!("{}", output::format_recommendation(&profile, &rec));
        }

        Commands::Catalog { category, face } => {
            let catalog = config.load_catalog(cli.catalog.as_deref())?;

            let items: Vec<_> = catalog
                .items()
                .iter()
                .filter(|item| category.map_or(true, |c| item.category == c))
                .filter(|item| face.map_or(true, |f| item.suits_face(f)))
                .collect();

            println!("カタログ: {}件 / 全{}件\n", items.len(), catalog.len());
            for item in items {
                println!("{}", output::catalog_row(item));
            }
        }

        Commands::FaceScan { image, use_cache, output: output_path } => {
            println!("📸 eyewear-advisor - AIフェイススキャン\n");

            let catalog = config.load_catalog(cli.catalog.as_deref())?;
            let advisor = build_advisor(cli.ai_provider, &config, &catalog)?;

            // カメラ・画像の読み込み失敗は画像なしの解析に切り替える
            let snapshot = match &image {
                Some(path) => match FileSnapshotSource::new(path, config.max_image_size).capture() {
                    Ok(s) => Some(s),
                    Err(e) => {
                        tracing::warn!(error = %e, "snapshot unavailable, analyzing without image");
                        None
                    }
                },
                None => None,
            };

            let cache_dir = Config::config_dir()?;
            let hash = snapshot.as_ref().map(snapshot_hash);
            let mut cache = CacheFile::load(&cache_dir);

            let cached = match (&hash, use_cache) {
                (Some(h), true) => cache.get(h).cloned(),
                _ => None,
            };

            let report = match cached {
                Some(report) => {
                    println!("✔ キャッシュから取得\n");
                    report
                }
                None => {
                    let pb = output::spinner("顔の特徴を解析中...");
                    let (report, origin) = advisor.analyze_face_traced(snapshot.as_ref()).await;
                    pb.finish_and_clear();

                    if let (Some(h), true, Origin::Live) = (hash, use_cache, origin) {
                        let source = image
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default();
                        // 保存に失敗しても結果は表示する
                        cache.insert_and_save(&cache_dir, h, source, report.clone());
                    }
                    report
                }
            };

            println!("{}", output::format_face_report(&report));

            if let Some(path) = output_path {
                std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
                println!("\n✔ 結果を保存: {}", path.display());
            }
        }

        Commands::Chat { message } => {
            let catalog = config.load_catalog(cli.catalog.as_deref())?;
            let advisor = build_advisor(cli.ai_provider, &config, &catalog)?;

            if let Some(message) = message {
                let reply = advisor.chat(&[], &message).await?;
                println!("{}", reply);
                return Ok(());
            }

            println!("💬 {} AI相談チャット（空行または /quit で終了）\n", config.shop.name);

            let mut history: Vec<ChatMessage> = Vec::new();
            let stdin = io::stdin();
            loop {
                print!("> ");
                io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim();
                if line.is_empty() || line == "/quit" {
                    break;
                }

                let pb = output::spinner("考え中...");
                let reply = advisor.chat(&history, line).await?;
                pb.finish_and_clear();

                println!("{}\n", reply);
                history.push(ChatMessage::user(line));
                history.push(ChatMessage::model(reply));
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  画像解析モデル: {}", config.vision_model);
                println!("  チャットモデル: {}", config.chat_model);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  閾値: Essential <= {:.2}D / Structure <= {:.2}D / 乱視 > {:.2}D",
                    config.thresholds.essential_max,
                    config.thresholds.structure_max,
                    config.thresholds.astigmatism_min
                );
                println!("  店舗: {} ({})", config.shop.name, config.shop.address);
                println!(
                    "  カタログ: {}",
                    config
                        .catalog_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".into())
                );
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Cache { clear, info } => {
            let cache_dir = Config::config_dir()?;
            let cache_path = CacheFile::cache_path(&cache_dir);

            if info || !clear {
                if cache_path.exists() {
                    let cache = CacheFile::load(&cache_dir);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match CacheFile::clear(&cache_dir) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
