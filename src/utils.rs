//! 内部ユーティリティ関数
//!
//! このモジュールには、型変換トレイトとキリル文字列処理のヘルパー関数が
//! 含まれています。主に以下の機能を提供します：
//!
//! - `FromU32`: u32からの型変換トレイト
//! - 語形文字列のクリーンアップ（正規表現ベース）
//! - 強勢（アクセント）位置の計算

use std::sync::LazyLock;

use regex::Regex;

/// ロシア語の母音集合。
///
/// 強勢位置は「何番目の母音か」という1始まりの序数で保存されるため、
/// 抽出側と参照側が同一の母音集合を使うことが前提になります。
pub(crate) const VOWELS: &str = "аоуыэяёюие";

static NON_CYRILLIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^а-яё\-]+").unwrap());

static NON_CYRILLIC_MARKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^а-яё'\-]+").unwrap());

static LATIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").unwrap());

/// 表層形からキリル文字とハイフン以外をすべて取り除きます。
#[inline]
pub(crate) fn clean_surface(s: &str) -> String {
    NON_CYRILLIC.replace_all(s, "").into_owned()
}

/// 強勢記号付き表層形からキリル文字・ハイフン・アポストロフィ以外を
/// すべて取り除きます。
#[inline]
pub(crate) fn clean_marked(s: &str) -> String {
    NON_CYRILLIC_MARKED.replace_all(s, "").into_owned()
}

/// 文字列にラテン小文字が含まれるかどうかを判定します。
///
/// コーパスの見出し行はロード前に小文字化されるため、小文字のみを検査します。
#[inline]
pub(crate) fn contains_latin(s: &str) -> bool {
    LATIN.is_match(s)
}

/// アポストロフィ付きの語形から強勢位置を求めます。
///
/// 戻り値はアポストロフィ直前までに現れた母音の個数、すなわち
/// 「何番目の母音に強勢があるか」の1始まりの序数です。
/// アポストロフィがなく母音がちょうど1つの場合はその母音とみなして`1`を、
/// それ以外は不明として`0`を返します。
pub(crate) fn find_stress(marked: &str) -> u16 {
    let mut vowel_count = 0;
    for c in marked.chars() {
        if VOWELS.contains(c) {
            vowel_count += 1;
        } else if c == '\'' {
            return vowel_count;
        }
    }
    if vowel_count == 1 {
        return 1;
    }
    0
}

/// 強勢序数から、強勢のある母音の文字位置を求めます。
///
/// # 引数
///
/// * `word` - 表層形
/// * `stress` - 1始まりの強勢母音序数（`0`は不明）
///
/// # 戻り値
///
/// 強勢母音の文字単位の位置。強勢が不明、または母音数が序数に
/// 満たない場合は`None`。
pub(crate) fn stress_char_index(word: &str, stress: u16) -> Option<usize> {
    if stress == 0 {
        return None;
    }
    let mut vowel_count = 0;
    for (i, c) in word.chars().enumerate() {
        if VOWELS.contains(c) {
            vowel_count += 1;
        }
        if vowel_count == stress {
            return Some(i);
        }
    }
    None
}

/// テキストをキリル文字の語へ分割します。
///
/// 入力を小文字化したうえで、キリル文字とハイフン以外の文字の並びを
/// 区切りとして分割します。空のトークンとハイフンだけのトークンは
/// 捨てられます。
pub(crate) fn split_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_CYRILLIC
        .split(&lowered)
        .filter(|t| t.chars().any(|c| c != '-'))
        .map(str::to_string)
        .collect()
}

/// u32から他の型への変換を提供するトレイト
///
/// 標準ライブラリの`From`トレイトとは異なり、プラットフォーム固有の
/// 仮定に基づいた最適化を行うことができます。
pub trait FromU32 {
    /// u32値から実装型を生成する
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}
