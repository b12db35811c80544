//! # Morfema
//!
//! Morfemaは、ロシア語のための圧縮形態素辞書の実装です。
//!
//! ## 概要
//!
//! このライブラリは、表層形からその語の全変化形（綴り・強勢位置・文法タグ）
//! を小さなパック表現から復元する解析器と、生のコーパス（語形変化表）から
//! そのパック表現を構築するビルダーを提供します。
//!
//! ## 主な機能
//!
//! - **パラダイム圧縮**: 変化規則を固定幅の`u16`配列にパックし、構造的に
//!   同一の変化型を1つのIDに重複排除します
//! - **シンボルインターニング**: 接頭辞・接尾辞・文法素・タググループを
//!   小さな整数IDで共有します
//! - **全域的な照会**: 未知語もエラーにならず、入力そのものを唯一の語形
//!   とする合成の単語が返ります
//! - **最近接語形の検索**: 性・格・数・時制・人称の制約に最も近い語形を
//!   決定的なスコアリングで選びます
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use morfema::{Analyzer, Case, DictionaryBuilder, Gender, Number, Person, Tense};
//!
//! let corpus = "\
//! красивый|прл муж ед им|краси'вый
//! красивая|прл жен ед им|краси'вая
//! красивую|прл жен ед вин|краси'вую
//! красивых|прл мн род|краси'вых
//! ";
//!
//! let dict = DictionaryBuilder::from_corpus(corpus.as_bytes())?;
//! let analyzer = Analyzer::new(dict);
//!
//! let infos = analyzer.word_info("красивую")?;
//! assert_eq!(infos[0].lemma().surface(), "красивый");
//!
//! let form = infos[0]
//!     .closest_form(
//!         Gender::Feminine,
//!         Case::Nominative,
//!         Number::Singular,
//!         Tense::None,
//!         Person::None,
//!         false,
//!         false,
//!     )
//!     .unwrap();
//! assert_eq!(form.surface(), "красивая");
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 形態素解析のファサード
pub mod analyzer;

/// バイナリフォーマットの共通設定
pub mod common;

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 文法カテゴリの定義
pub mod grammar;

/// 内部ユーティリティ関数
mod utils;

/// 単語とその語形のランタイム表現
pub mod word;

#[cfg(test)]
mod tests;

// Re-exports
pub use analyzer::Analyzer;
pub use dictionary::{Dictionary, DictionaryBuilder};
pub use grammar::{Case, Gender, Number, Person, Pos, Tag, Tense};
pub use word::{Word, WordForm};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
