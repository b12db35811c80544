//! 単語とその語形のランタイム表現
//!
//! このモジュールは、保存された`(語幹, パラダイムID)`レコードから全語形を
//! 復元する[`Word`]と、復元された1語形を表す[`WordForm`]を提供します。
//! どちらも照会ごとに新しく構築され、呼び出し側が所有します。辞書側の
//! 可変状態への参照は持ちません。

use crate::dictionary::paradigm;
use crate::dictionary::{Storage, WordEntry};
use crate::errors::{MorfemaError, Result};
use crate::grammar::{Case, Gender, Number, Person, Pos, Tag, Tense};
use crate::utils;

/// 復元された1つの語形
///
/// 表層形の綴り、強勢位置、文法素ID列、およびデコード済みの文法情報を
/// 保持します。
#[derive(Clone, Debug)]
pub struct WordForm {
    surface: String,
    stress: u16,
    grammemes: Vec<u16>,
    tag: Tag,
}

impl WordForm {
    /// 表層形の綴りを返します。
    #[inline(always)]
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// 強勢母音の1始まりの序数を返します。`0`は不明です。
    #[inline(always)]
    pub fn stress(&self) -> u16 {
        self.stress
    }

    /// この語形に付く文法素のID列を返します。
    #[inline(always)]
    pub fn grammemes(&self) -> &[u16] {
        &self.grammemes
    }

    /// デコード済みの文法情報を返します。
    #[inline(always)]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// 強勢のある母音の文字位置を返します。
    ///
    /// # 戻り値
    ///
    /// 表層形における強勢母音の文字単位の位置。強勢が不明な場合は`None`。
    pub fn stress_char_index(&self) -> Option<usize> {
        utils::stress_char_index(&self.surface, self.stress)
    }
}

/// 単語：語幹と、その全語形
///
/// `forms()[0]`は常に見出し語（辞書形）です。残りの語形は
/// 決定的な正規順序（見出し語と品詞が異なるものは後、以降は数・性・
/// 人称・時制・格の昇順、各カテゴリで未定義は最後）に並びます。
#[derive(Clone, Debug)]
pub struct Word {
    stem: String,
    forms: Vec<WordForm>,
}

impl Word {
    /// 保存済みレコードから単語を復元します。
    ///
    /// パラダイムIDが`0`の場合は全フィールドが0の1規則パラダイムが使われ、
    /// 語幹そのものが唯一の語形になります。
    ///
    /// 名詞の見出し語に性が定義されている場合、性の文法素を持たない語形は
    /// 見出し語の性を引き継ぎます（格変化表は見出し語と重複する性を省略
    /// するため）。
    ///
    /// # 引数
    ///
    /// * `entry` - 保存済みの単語レコード
    /// * `storage` - インターンされたテーブル
    /// * `paradigms` - パラダイム一覧（IDは1始まり）
    ///
    /// # エラー
    ///
    /// パラダイムIDまたは規則中のIDがテーブルの範囲外の場合にエラーを
    /// 返します。
    pub fn decode(entry: &WordEntry, storage: &Storage, paradigms: &[Vec<u16>]) -> Result<Self> {
        let empty;
        let packed: &[u16] = if entry.paradigm_id == 0 {
            empty = paradigm::empty();
            &empty
        } else {
            paradigms
                .get(usize::from(entry.paradigm_id) - 1)
                .ok_or_else(|| {
                    MorfemaError::invalid_argument(
                        "entry",
                        format!("Paradigm id out of range: {}", entry.paradigm_id),
                    )
                })?
        };

        let mut forms = Vec::with_capacity(paradigm::num_rules(packed));
        for rule in paradigm::decode(packed) {
            let surface = format!(
                "{}{}{}",
                storage.prefix(rule.prefix)?,
                entry.stem,
                storage.suffix(rule.suffix)?
            );
            let grammemes = storage.tag_group(rule.tag_group)?.to_vec();
            let tag = Tag::from_grammemes(&storage.tag_group_grammemes(rule.tag_group)?);
            forms.push(WordForm {
                surface,
                stress: rule.stress,
                grammemes,
                tag,
            });
        }

        let lemma_tag = forms[0].tag;
        if lemma_tag.pos == Pos::Noun && lemma_tag.gender != Gender::None {
            for form in forms.iter_mut() {
                if form.tag.gender == Gender::None {
                    form.tag.gender = lemma_tag.gender;
                }
            }
        }

        forms[1..].sort_by_key(|f| f.tag.ordering_key(lemma_tag.pos));

        Ok(Self {
            stem: entry.stem.clone(),
            forms,
        })
    }

    /// 語幹を返します。
    #[inline(always)]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// 見出し語の語形を返します。
    #[inline(always)]
    pub fn lemma(&self) -> &WordForm {
        &self.forms[0]
    }

    /// すべての語形を正規順序で返します。
    #[inline(always)]
    pub fn forms(&self) -> &[WordForm] {
        &self.forms
    }

    /// 綴りが一致するすべての語形を返します。
    ///
    /// 比較は綴りの同一性に加えて、文書化されたё/е交替のみを許します。
    /// それ以外の綴り揺れは一致とみなしません。
    pub fn exact_forms(&self, surface: &str) -> Vec<&WordForm> {
        let normalized = surface.replace('ё', "е");
        self.forms
            .iter()
            .filter(|f| f.surface == surface || f.surface.replace('ё', "е") == normalized)
            .collect()
    }

    /// 要求された文法属性に最も近い語形を返します。
    ///
    /// 各語形のスコアは、要求されていて一致しない属性1つにつき1、
    /// さらに品詞が見出し語と異なる場合に10を加えたものです。スコア
    /// 最小の語形を返し、同点の場合は正規順序で先の語形が選ばれます。
    ///
    /// # 引数
    ///
    /// * `gender`/`case`/`number`/`tense`/`person` - 要求する属性
    ///   （`None`バリアントは「指定なし」）
    /// * `exact_match` - `true`の場合、最小スコアが0でなければ`None`を
    ///   返します
    /// * `ignore_undefined` - `true`の場合、語形側で未定義の属性も
    ///   不一致として数えます
    #[allow(clippy::too_many_arguments)]
    pub fn closest_form(
        &self,
        gender: Gender,
        case: Case,
        number: Number,
        tense: Tense,
        person: Person,
        exact_match: bool,
        ignore_undefined: bool,
    ) -> Option<&WordForm> {
        let lemma_pos = self.forms[0].tag.pos;

        let mut best: Option<(&WordForm, u32)> = None;
        for form in &self.forms {
            let mut score =
                form.tag
                    .difference_from(gender, case, number, tense, person, ignore_undefined);
            if form.tag.pos != lemma_pos {
                score += 10;
            }
            // 同点では正規順序で先の語形を保持する
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((form, score));
            }
        }

        let (form, score) = best?;
        if exact_match && score > 0 {
            return None;
        }
        Some(form)
    }
}
