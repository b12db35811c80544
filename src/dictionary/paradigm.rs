//! パラダイムの固定幅バイナリレイアウト
//!
//! パラダイムは1つの平坦な`u16`配列で、長さは`4 * 規則数`です。論理的には
//! 4本の列（接頭辞ID列、接尾辞ID列、強勢列、タググループID列）を連結した
//! ものです。規則`i`の値は以下の位置にあります：
//!
//! ```text
//! prefix    = paradigm[i]
//! suffix    = paradigm[n + i]
//! stress    = paradigm[2n + i]
//! tag_group = paradigm[3n + i]       （n = 規則数）
//! ```
//!
//! テキスト形式（`paradigms.txt`）はこの配列を空白区切りの10進数で
//! 並べたもので、1行が1パラダイムです。

use crate::errors::{MorfemaError, Result};

/// 1つの語形を構築する規則
///
/// 接頭辞と接尾辞は[`Storage`](crate::dictionary::Storage)のID、強勢は
/// 1始まりの強勢母音序数（`0`は不明）、タググループはその語形に付く
/// 文法素集合のIDです。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct MorphRule {
    /// 接頭辞ID（`0`は空）
    pub prefix: u16,

    /// 接尾辞ID（`0`は空）
    pub suffix: u16,

    /// 強勢母音の序数（`0`は不明）
    pub stress: u16,

    /// タググループID（`0`は空集合）
    pub tag_group: u16,
}

/// 規則列を平坦な列指向配列にエンコードします。
pub fn encode(rules: &[MorphRule]) -> Vec<u16> {
    let n = rules.len();
    let mut packed = vec![0; n * 4];
    for (i, rule) in rules.iter().enumerate() {
        packed[i] = rule.prefix;
        packed[n + i] = rule.suffix;
        packed[2 * n + i] = rule.stress;
        packed[3 * n + i] = rule.tag_group;
    }
    packed
}

/// パラダイムに含まれる規則の数を返します。
#[inline(always)]
pub fn num_rules(paradigm: &[u16]) -> usize {
    paradigm.len() / 4
}

/// 指定位置の規則を取り出します。
#[inline(always)]
pub fn rule_at(paradigm: &[u16], i: usize) -> MorphRule {
    let n = num_rules(paradigm);
    MorphRule {
        prefix: paradigm[i],
        suffix: paradigm[n + i],
        stress: paradigm[2 * n + i],
        tag_group: paradigm[3 * n + i],
    }
}

/// パラダイムを規則列にデコードするイテレータを返します。
pub fn decode(paradigm: &[u16]) -> impl Iterator<Item = MorphRule> + '_ {
    (0..num_rules(paradigm)).map(move |i| rule_at(paradigm, i))
}

/// 重複排除用の正規化キーを返します。
///
/// 空白区切りの10進シリアライズで、テキスト形式の1行と同一です。
/// ハッシュキーとしてのみ使われ、このキー自体がディスクに保存される
/// ことはありません。
pub fn canonical_key(paradigm: &[u16]) -> String {
    paradigm
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 変化型を持たない語のための、全フィールドが0の1規則パラダイムを
/// 返します。
pub fn empty() -> Vec<u16> {
    vec![0; 4]
}

/// テキスト形式の1行をパラダイムにパースします。
///
/// # エラー
///
/// 数値のパースに失敗した場合、または値の個数が4の倍数でない場合に
/// エラーを返します。
pub fn parse_line(line: &str) -> Result<Vec<u16>> {
    let values = line
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<Vec<u16>, _>>()?;
    if values.is_empty() || values.len() % 4 != 0 {
        return Err(MorfemaError::invalid_format(
            "paradigms",
            format!("Length must be a positive multiple of four: {line:?}"),
        ));
    }
    Ok(values)
}
