//! 文法カテゴリの定義
//!
//! このモジュールは、品詞・性・数・格・時制・人称の6つの文法カテゴリを
//! 型付き列挙型として定義し、文法素（グラメーム）文字列からの変換テーブルを
//! 提供します。変換は固定のmatchテーブルで行われ、実行時に変更されることは
//! ありません。

/// 品詞
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u16)]
pub enum Pos {
    /// 未定義
    #[default]
    None,
    /// 名詞
    Noun,
    /// 形容詞
    Adjective,
    /// 動詞
    Verb,
    /// 副詞
    Adverb,
    /// 数詞
    Numeral,
    /// 形動詞
    Participle,
    /// 副動詞
    Transgressive,
    /// 代名詞
    Pronoun,
    /// 前置詞
    Preposition,
    /// 接続詞
    Conjunction,
    /// 小詞
    Particle,
    /// 間投詞
    Interjection,
    /// 述語詞
    Predicative,
    /// 挿入語
    Parenthesis,
}

impl Pos {
    /// 文法素文字列から品詞を決定します。
    pub fn from_grammeme(grammeme: &str) -> Self {
        match grammeme {
            "сущ" => Self::Noun,
            "прл" => Self::Adjective,
            "гл" => Self::Verb,
            "нар" => Self::Adverb,
            "числ" => Self::Numeral,
            "прч" => Self::Participle,
            "дееп" => Self::Transgressive,
            "мест" => Self::Pronoun,
            "предл" => Self::Preposition,
            "союз" => Self::Conjunction,
            "част" => Self::Particle,
            "межд" => Self::Interjection,
            "предик" => Self::Predicative,
            "ввод" => Self::Parenthesis,
            _ => Self::None,
        }
    }
}

/// 性
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u16)]
pub enum Gender {
    /// 未定義
    #[default]
    None,
    /// 男性
    Masculine,
    /// 女性
    Feminine,
    /// 中性
    Neuter,
    /// 通性
    Common,
}

impl Gender {
    /// 文法素文字列から性を決定します。
    pub fn from_grammeme(grammeme: &str) -> Self {
        match grammeme {
            "муж" => Self::Masculine,
            "жен" => Self::Feminine,
            "ср" => Self::Neuter,
            "общ" => Self::Common,
            _ => Self::None,
        }
    }
}

/// 数
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u16)]
pub enum Number {
    /// 未定義
    #[default]
    None,
    /// 単数
    Singular,
    /// 複数
    Plural,
}

impl Number {
    /// 文法素文字列から数を決定します。
    pub fn from_grammeme(grammeme: &str) -> Self {
        match grammeme {
            "ед" => Self::Singular,
            "мн" => Self::Plural,
            _ => Self::None,
        }
    }
}

/// 格
///
/// `мест`（代名詞）は品詞カテゴリに属するため、位置格はここでは
/// 扱いません。カテゴリ間の重複は構築時の検証で拒否されます。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u16)]
pub enum Case {
    /// 未定義
    #[default]
    None,
    /// 主格
    Nominative,
    /// 生格
    Genitive,
    /// 与格
    Dative,
    /// 対格
    Accusative,
    /// 造格
    Instrumental,
    /// 前置格
    Prepositional,
    /// 部分格
    Partitive,
    /// 呼格
    Vocative,
}

impl Case {
    /// 文法素文字列から格を決定します。
    pub fn from_grammeme(grammeme: &str) -> Self {
        match grammeme {
            "им" => Self::Nominative,
            "род" => Self::Genitive,
            "дат" => Self::Dative,
            "вин" => Self::Accusative,
            "тв" => Self::Instrumental,
            "пр" => Self::Prepositional,
            "парт" => Self::Partitive,
            "зват" => Self::Vocative,
            _ => Self::None,
        }
    }
}

/// 時制
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u16)]
pub enum Tense {
    /// 未定義
    #[default]
    None,
    /// 過去
    Past,
    /// 現在
    Present,
    /// 未来
    Future,
    /// 不定形
    Infinitive,
}

impl Tense {
    /// 文法素文字列から時制を決定します。
    pub fn from_grammeme(grammeme: &str) -> Self {
        match grammeme {
            "прош" => Self::Past,
            "наст" => Self::Present,
            "буд" => Self::Future,
            "инф" => Self::Infinitive,
            _ => Self::None,
        }
    }
}

/// 人称
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u16)]
pub enum Person {
    /// 未定義
    #[default]
    None,
    /// 一人称
    First,
    /// 二人称
    Second,
    /// 三人称
    Third,
}

impl Person {
    /// 文法素文字列から人称を決定します。
    pub fn from_grammeme(grammeme: &str) -> Self {
        match grammeme {
            "1-е" => Self::First,
            "2-е" => Self::Second,
            "3-е" => Self::Third,
            _ => Self::None,
        }
    }
}

/// 並べ替えで「未定義は最後」を表す値。
const UNDEFINED_ORDER: u16 = 100;

/// 列挙値を語形一覧の正規順序キーに変換します。
#[inline]
fn order_key(value: u16) -> u16 {
    if value == 0 {
        UNDEFINED_ORDER
    } else {
        value
    }
}

/// 文法素文字列が非デフォルト値に分類されるカテゴリの数を数えます。
///
/// 辞書データの健全性検査に使用されます。1を超える場合、その文法素は
/// 複数のカテゴリに属しており、データとして矛盾しています。
pub(crate) fn category_count(grammeme: &str) -> usize {
    let mut count = 0;
    if Pos::from_grammeme(grammeme) != Pos::None {
        count += 1;
    }
    if Gender::from_grammeme(grammeme) != Gender::None {
        count += 1;
    }
    if Number::from_grammeme(grammeme) != Number::None {
        count += 1;
    }
    if Case::from_grammeme(grammeme) != Case::None {
        count += 1;
    }
    if Tense::from_grammeme(grammeme) != Tense::None {
        count += 1;
    }
    if Person::from_grammeme(grammeme) != Person::None {
        count += 1;
    }
    count
}

/// 1つの語形にデコードされた文法情報
///
/// 文法素の集合から決定された品詞・性・数・格・時制・人称を保持します。
/// 各カテゴリは定義されていない場合に`None`バリアントを取ります。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct Tag {
    /// 品詞
    pub pos: Pos,
    /// 性
    pub gender: Gender,
    /// 数
    pub number: Number,
    /// 格
    pub case: Case,
    /// 時制
    pub tense: Tense,
    /// 人称
    pub person: Person,
}

impl Tag {
    /// 文法素文字列の列からタグをデコードします。
    ///
    /// 品詞は先頭の文法素からのみ決定されます。それ以外のカテゴリは
    /// 2番目以降の文法素を走査し、最初に決定された値を採用します。
    pub fn from_grammemes<S>(grammemes: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let mut tag = Self::default();
        let Some(first) = grammemes.first() else {
            return tag;
        };
        tag.pos = Pos::from_grammeme(first.as_ref());

        for grammeme in &grammemes[1..] {
            let grammeme = grammeme.as_ref();
            if tag.gender == Gender::None {
                tag.gender = Gender::from_grammeme(grammeme);
            }
            if tag.number == Number::None {
                tag.number = Number::from_grammeme(grammeme);
            }
            if tag.case == Case::None {
                tag.case = Case::from_grammeme(grammeme);
            }
            if tag.tense == Tense::None {
                tag.tense = Tense::from_grammeme(grammeme);
            }
            if tag.person == Person::None {
                tag.person = Person::from_grammeme(grammeme);
            }
        }
        tag
    }

    /// 要求された文法属性との不一致数を数えます。
    ///
    /// 各属性は、要求側で指定されている場合にのみ数えられます。
    /// `ignore_undefined`が`false`の場合は、さらに語形側でその属性が
    /// 定義されている場合にのみ数えられます（未定義の属性は不一致に
    /// なりません）。`true`の場合、未定義の属性も不一致として数えます。
    ///
    /// # 戻り値
    ///
    /// 不一致となった属性の個数
    pub fn difference_from(
        &self,
        gender: Gender,
        case: Case,
        number: Number,
        tense: Tense,
        person: Person,
        ignore_undefined: bool,
    ) -> u32 {
        let mut dist = 0;
        if gender != Gender::None
            && (ignore_undefined || self.gender != Gender::None)
            && gender != self.gender
        {
            dist += 1;
        }
        if case != Case::None && (ignore_undefined || self.case != Case::None) && case != self.case
        {
            dist += 1;
        }
        if number != Number::None
            && (ignore_undefined || self.number != Number::None)
            && number != self.number
        {
            dist += 1;
        }
        if tense != Tense::None
            && (ignore_undefined || self.tense != Tense::None)
            && tense != self.tense
        {
            dist += 1;
        }
        if person != Person::None
            && (ignore_undefined || self.person != Person::None)
            && person != self.person
        {
            dist += 1;
        }
        dist
    }

    /// 語形一覧の正規順序キーを返します。
    ///
    /// 見出し語を除く語形は `(品詞が見出し語と異なるか, 数, 性, 人称,
    /// 時制, 格)` の昇順に並びます。各カテゴリで未定義は最後に来ます。
    pub(crate) fn ordering_key(&self, lemma_pos: Pos) -> (bool, u16, u16, u16, u16, u16) {
        (
            self.pos != lemma_pos,
            order_key(self.number as u16),
            order_key(self.gender as u16),
            order_key(self.person as u16),
            order_key(self.tense as u16),
            order_key(self.case as u16),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_adjective() {
        let tag = Tag::from_grammemes(&["прл", "жен", "ед", "им"]);
        assert_eq!(tag.pos, Pos::Adjective);
        assert_eq!(tag.gender, Gender::Feminine);
        assert_eq!(tag.number, Number::Singular);
        assert_eq!(tag.case, Case::Nominative);
        assert_eq!(tag.tense, Tense::None);
        assert_eq!(tag.person, Person::None);
    }

    #[test]
    fn test_pos_from_first_grammeme_only() {
        // 品詞の文法素が先頭にない場合、品詞は未定義のまま
        let tag = Tag::from_grammemes(&["ед", "сущ"]);
        assert_eq!(tag.pos, Pos::None);
    }

    #[test]
    fn test_empty_grammemes() {
        let tag = Tag::from_grammemes::<&str>(&[]);
        assert_eq!(tag, Tag::default());
    }

    #[test]
    fn test_difference_counts_requested_only() {
        let tag = Tag::from_grammemes(&["сущ", "жен", "ед", "им"]);
        assert_eq!(
            tag.difference_from(
                Gender::Feminine,
                Case::None,
                Number::None,
                Tense::None,
                Person::None,
                false,
            ),
            0
        );
        assert_eq!(
            tag.difference_from(
                Gender::Masculine,
                Case::Genitive,
                Number::None,
                Tense::None,
                Person::None,
                false,
            ),
            2
        );
    }

    #[test]
    fn test_difference_undefined_attribute() {
        // 時制が未定義の名詞形
        let tag = Tag::from_grammemes(&["сущ", "жен", "ед"]);
        let with_skip = tag.difference_from(
            Gender::None,
            Case::None,
            Number::None,
            Tense::Past,
            Person::None,
            false,
        );
        assert_eq!(with_skip, 0);
        let without_skip = tag.difference_from(
            Gender::None,
            Case::None,
            Number::None,
            Tense::Past,
            Person::None,
            true,
        );
        assert_eq!(without_skip, 1);
    }

    #[test]
    fn test_category_count_disjoint() {
        assert_eq!(category_count("мн"), 1);
        assert_eq!(category_count("вин"), 1);
        assert_eq!(category_count("мест"), 1);
        assert_eq!(category_count("xyz"), 0);
    }
}
