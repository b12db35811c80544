//! シンボルインターナー
//!
//! このモジュールは、接頭辞・接尾辞・文法素・タググループ・単語レコードを
//! 小さな整数IDに相互変換するストレージを提供します。すべてのテーブルは
//! 追記専用で、構築後は読み取り専用として扱われます。
//!
//! 公開IDは1始まりで、`0`は「空・不在」を意味する番兵値として恒久的に
//! 予約されています。空文字列をインターンしてもテーブルは成長しません。

use std::io::{BufRead, BufReader, Read, Write};

use hashbrown::HashMap;

use crate::errors::{MorfemaError, Result};
use crate::grammar;

/// 永続化される単語レコード
///
/// 表層形索引が指す、語幹とパラダイムIDの組です。
/// `paradigm_id == 0` は「既知の変化型を持たない語」を意味し、
/// その場合は語幹そのものが唯一の語形になります。
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct WordEntry {
    /// 語幹
    pub stem: String,

    /// パラダイムID（1始まり、`0`はパラダイムなし）
    pub paradigm_id: u16,
}

impl WordEntry {
    /// `語幹|パラダイムID` 形式の1行をパースします。
    pub(crate) fn from_line(line: &str) -> Result<Self> {
        let (stem, paradigm_id) = line.split_once('|').ok_or_else(|| {
            MorfemaError::invalid_format("words", format!("Missing separator: {line:?}"))
        })?;
        Ok(Self {
            stem: stem.to_string(),
            paradigm_id: paradigm_id.parse()?,
        })
    }

    /// `語幹|パラダイムID` 形式の1行を生成します。
    pub(crate) fn to_line(&self) -> String {
        format!("{}|{}", self.stem, self.paradigm_id)
    }
}

/// 文字列・バイト列グループを整数IDへ相互変換するストレージ
///
/// 構築時には[`Storage::intern_prefix`]などのインターン操作で重複なく
/// IDを割り当て、照会時には[`Storage::prefix`]などの解決操作でIDから
/// 値を引きます。
#[derive(Default)]
pub struct Storage {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
    grammemes: Vec<String>,
    tag_groups: Vec<Vec<u16>>,
    words: Vec<WordEntry>,

    prefix_ids: HashMap<String, u16>,
    suffix_ids: HashMap<String, u16>,
    grammeme_ids: HashMap<String, u16>,
    tag_group_ids: HashMap<String, u16>,
    word_ids: HashMap<(String, u16), u32>,
}

/// 重複排除付きでテーブルに値を追加し、1始まりのIDを返します。
///
/// 空文字列はテーブルを成長させずに`0`を返します。重複排除マップの
/// 指すインデックスがテーブル長を超えている場合、インターナーの内部
/// 状態が破綻しているため致命的エラーを返します。
fn intern_into(map: &mut HashMap<String, u16>, list: &mut Vec<String>, value: &str) -> Result<u16> {
    if value.is_empty() {
        return Ok(0);
    }
    if let Some(&id) = map.get(value) {
        return Ok(id);
    }
    let index = map.len();
    if index > list.len() {
        return Err(MorfemaError::invalid_state(
            "interner index exceeds the backing list length",
            format!("index={}, len={}", index, list.len()),
        ));
    }
    list.push(value.to_string());
    let id = u16::try_from(index + 1)?;
    map.insert(value.to_string(), id);
    Ok(id)
}

impl Storage {
    /// 新しい空のストレージを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 接頭辞をインターンします。空文字列は`0`になります。
    pub fn intern_prefix(&mut self, prefix: &str) -> Result<u16> {
        intern_into(&mut self.prefix_ids, &mut self.prefixes, prefix)
    }

    /// 接尾辞をインターンします。空文字列は`0`になります。
    pub fn intern_suffix(&mut self, suffix: &str) -> Result<u16> {
        intern_into(&mut self.suffix_ids, &mut self.suffixes, suffix)
    }

    /// 文法素をインターンします。
    pub fn intern_grammeme(&mut self, grammeme: &str) -> Result<u16> {
        intern_into(&mut self.grammeme_ids, &mut self.grammemes, grammeme)
    }

    /// 文法素の集合をタググループとしてインターンします。
    ///
    /// 各文法素をインターンしたIDの組を昇順に並べ替えたものがグループの
    /// 内容になります。同一内容のグループは同じIDを共有します。
    pub fn intern_tag_group<S>(&mut self, grammemes: &[S]) -> Result<u16>
    where
        S: AsRef<str>,
    {
        let mut ids = Vec::with_capacity(grammemes.len());
        for grammeme in grammemes {
            ids.push(self.intern_grammeme(grammeme.as_ref())?);
        }
        ids.sort_unstable();

        let key = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("|");
        if key.is_empty() {
            return Ok(0);
        }
        if let Some(&id) = self.tag_group_ids.get(&key) {
            return Ok(id);
        }
        let index = self.tag_group_ids.len();
        if index > self.tag_groups.len() {
            return Err(MorfemaError::invalid_state(
                "interner index exceeds the backing list length",
                format!("index={}, len={}", index, self.tag_groups.len()),
            ));
        }
        self.tag_groups.push(ids);
        let id = u16::try_from(index + 1)?;
        self.tag_group_ids.insert(key, id);
        Ok(id)
    }

    /// 単語レコードをインターンし、1始まりの単語IDを返します。
    ///
    /// 同一の `(語幹, パラダイムID)` 組は同じIDを共有します。
    pub fn intern_word(&mut self, stem: &str, paradigm_id: u16) -> Result<u32> {
        let key = (stem.to_string(), paradigm_id);
        if let Some(&id) = self.word_ids.get(&key) {
            return Ok(id);
        }
        let index = self.word_ids.len();
        if index > self.words.len() {
            return Err(MorfemaError::invalid_state(
                "interner index exceeds the backing list length",
                format!("index={}, len={}", index, self.words.len()),
            ));
        }
        self.words.push(WordEntry {
            stem: stem.to_string(),
            paradigm_id,
        });
        let id = u32::try_from(index + 1)?;
        self.word_ids.insert(key, id);
        Ok(id)
    }

    /// IDから接頭辞を解決します。`0`は空文字列です。
    pub fn prefix(&self, id: u16) -> Result<&str> {
        if id == 0 {
            return Ok("");
        }
        self.prefixes
            .get(usize::from(id) - 1)
            .map(String::as_str)
            .ok_or_else(|| {
                MorfemaError::invalid_argument("id", format!("Prefix id out of range: {id}"))
            })
    }

    /// IDから接尾辞を解決します。`0`は空文字列です。
    pub fn suffix(&self, id: u16) -> Result<&str> {
        if id == 0 {
            return Ok("");
        }
        self.suffixes
            .get(usize::from(id) - 1)
            .map(String::as_str)
            .ok_or_else(|| {
                MorfemaError::invalid_argument("id", format!("Suffix id out of range: {id}"))
            })
    }

    /// IDから文法素を解決します。
    pub fn grammeme(&self, id: u16) -> Result<&str> {
        if id == 0 {
            return Err(MorfemaError::invalid_argument(
                "id",
                "Grammeme id must be positive",
            ));
        }
        self.grammemes
            .get(usize::from(id) - 1)
            .map(String::as_str)
            .ok_or_else(|| {
                MorfemaError::invalid_argument("id", format!("Grammeme id out of range: {id}"))
            })
    }

    /// IDからタググループを解決します。`0`は空集合です。
    pub fn tag_group(&self, id: u16) -> Result<&[u16]> {
        if id == 0 {
            return Ok(&[]);
        }
        self.tag_groups
            .get(usize::from(id) - 1)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                MorfemaError::invalid_argument("id", format!("Tag group id out of range: {id}"))
            })
    }

    /// タググループIDに属する文法素文字列を解決します。
    pub fn tag_group_grammemes(&self, id: u16) -> Result<Vec<&str>> {
        self.tag_group(id)?
            .iter()
            .map(|&grammeme_id| self.grammeme(grammeme_id))
            .collect()
    }

    /// IDから単語レコードを解決します。
    pub fn word(&self, id: u32) -> Result<&WordEntry> {
        if id == 0 {
            return Err(MorfemaError::invalid_argument(
                "id",
                "Word id must be positive",
            ));
        }
        self.words.get(id as usize - 1).ok_or_else(|| {
            MorfemaError::invalid_argument("id", format!("Word id out of range: {id}"))
        })
    }

    /// 接頭辞テーブルの要素数を返します。
    pub fn num_prefixes(&self) -> usize {
        self.prefixes.len()
    }

    /// 接尾辞テーブルの要素数を返します。
    pub fn num_suffixes(&self) -> usize {
        self.suffixes.len()
    }

    /// 文法素テーブルの要素数を返します。
    pub fn num_grammemes(&self) -> usize {
        self.grammemes.len()
    }

    /// タググループテーブルの要素数を返します。
    pub fn num_tag_groups(&self) -> usize {
        self.tag_groups.len()
    }

    /// 単語テーブルの要素数を返します。
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// すべての文法素が高々1つのカテゴリにのみ分類されることを検証します。
    ///
    /// # エラー
    ///
    /// ある文法素が複数のカテゴリで非デフォルト値に分類される場合、
    /// データは矛盾しているため[`MorfemaError::InvalidFormat`]を返します。
    pub fn verify_grammemes(&self) -> Result<()> {
        for grammeme in &self.grammemes {
            if grammar::category_count(grammeme) > 1 {
                return Err(MorfemaError::invalid_format(
                    "grammemes",
                    format!("Grammeme {grammeme:?} is assignable to multiple categories"),
                ));
            }
        }
        Ok(())
    }

    /// テーブルを行指向のテキスト形式で書き出します。
    ///
    /// 各テーブルは1行1レコードで、行番号（1始まり）が暗黙のIDになります。
    /// タググループは空白区切りの文法素ID列、単語は`語幹|パラダイムID`です。
    pub fn write<P, S, G, T, W>(
        &self,
        mut prefix_wtr: P,
        mut suffix_wtr: S,
        mut grammeme_wtr: G,
        mut tag_group_wtr: T,
        mut word_wtr: W,
    ) -> Result<()>
    where
        P: Write,
        S: Write,
        G: Write,
        T: Write,
        W: Write,
    {
        for prefix in &self.prefixes {
            writeln!(prefix_wtr, "{prefix}")?;
        }
        for suffix in &self.suffixes {
            writeln!(suffix_wtr, "{suffix}")?;
        }
        for grammeme in &self.grammemes {
            writeln!(grammeme_wtr, "{grammeme}")?;
        }
        for group in &self.tag_groups {
            let line = group
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(tag_group_wtr, "{line}")?;
        }
        for word in &self.words {
            writeln!(word_wtr, "{}", word.to_line())?;
        }
        Ok(())
    }

    /// 行指向のテキスト形式からストレージを再構築します。
    ///
    /// 重複排除マップも再構築されるため、読み込んだストレージに対して
    /// インターン操作を継続できます。
    ///
    /// # エラー
    ///
    /// 数値のパースに失敗した場合、またはタググループが範囲外の文法素IDを
    /// 参照している場合にエラーを返します。
    pub fn from_readers<P, S, G, T, W>(
        prefix_rdr: P,
        suffix_rdr: S,
        grammeme_rdr: G,
        tag_group_rdr: T,
        word_rdr: W,
    ) -> Result<Self>
    where
        P: Read,
        S: Read,
        G: Read,
        T: Read,
        W: Read,
    {
        let mut storage = Self::new();

        for line in BufReader::new(prefix_rdr).lines() {
            storage.intern_prefix(&line?)?;
        }
        for line in BufReader::new(suffix_rdr).lines() {
            storage.intern_suffix(&line?)?;
        }
        for line in BufReader::new(grammeme_rdr).lines() {
            storage.intern_grammeme(&line?)?;
        }
        for line in BufReader::new(tag_group_rdr).lines() {
            let line = line?;
            let mut ids = Vec::new();
            for part in line.split_whitespace() {
                let id: u16 = part.parse()?;
                if id == 0 || usize::from(id) > storage.grammemes.len() {
                    return Err(MorfemaError::invalid_format(
                        "tag_groups",
                        format!("Grammeme id out of range: {id}"),
                    ));
                }
                ids.push(id);
            }
            let key = ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("|");
            let id = u16::try_from(storage.tag_groups.len() + 1)?;
            storage.tag_groups.push(ids);
            storage.tag_group_ids.insert(key, id);
        }
        for line in BufReader::new(word_rdr).lines() {
            let entry = WordEntry::from_line(&line?)?;
            let id = u32::try_from(storage.words.len() + 1)?;
            storage
                .word_ids
                .insert((entry.stem.clone(), entry.paradigm_id), id);
            storage.words.push(entry);
        }

        storage.verify_grammemes()?;
        Ok(storage)
    }
}
