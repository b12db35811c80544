//! 形態素辞書のモジュール
//!
//! このモジュールは、解析に必要な辞書データの構築・保存・読み込みを
//! 行います。辞書は以下のコンポーネントから構成されます：
//!
//! - インターンされたテーブル（接頭辞・接尾辞・文法素・タググループ・単語）
//! - パックされたパラダイム一覧
//! - 表層形から単語IDへの2つの索引（単独・同形異義）
//!
//! すべてのコンポーネントは構築後に読み取り専用となり、ロック無しで
//! 任意数の並行検索から共有できます。
//!
//! # ディスク上のレイアウト
//!
//! 辞書は1つのディレクトリに保存されます。テーブルは1行1レコードの
//! UTF-8テキスト（行番号が暗黙のID）、索引はマジックバイト付きの
//! バイナリブロブです。
//!
//! | ファイル | 内容 |
//! |---|---|
//! | `prefixes.txt` | 接頭辞テーブル |
//! | `suffixes.txt` | 接尾辞テーブル |
//! | `grammemes.txt` | 文法素テーブル |
//! | `tag_groups.txt` | タググループ（空白区切りの文法素ID列） |
//! | `words.txt` | 単語レコード（`語幹\|パラダイムID`） |
//! | `paradigms.txt` | パラダイム（空白区切りの`u16`列） |
//! | `forms_single.idx` | 単独表層形索引 |
//! | `forms_multi.idx` | 同形異義表層形索引 |

pub mod builder;
pub mod form_index;
pub(crate) mod generator;
pub mod paradigm;
pub mod storage;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read};
use std::path::Path;

use log::info;

use crate::dictionary::form_index::{MultiFormIndex, SingleFormIndex};
use crate::errors::{MorfemaError, Result};
use crate::word::Word;

pub use crate::dictionary::builder::DictionaryBuilder;
pub use crate::dictionary::storage::{Storage, WordEntry};

/// 接頭辞テーブルのファイル名
pub const PREFIXES_FILE: &str = "prefixes.txt";
/// 接尾辞テーブルのファイル名
pub const SUFFIXES_FILE: &str = "suffixes.txt";
/// 文法素テーブルのファイル名
pub const GRAMMEMES_FILE: &str = "grammemes.txt";
/// タググループテーブルのファイル名
pub const TAG_GROUPS_FILE: &str = "tag_groups.txt";
/// 単語テーブルのファイル名
pub const WORDS_FILE: &str = "words.txt";
/// パラダイム一覧のファイル名
pub const PARADIGMS_FILE: &str = "paradigms.txt";
/// 単独表層形索引のファイル名
pub const SINGLE_INDEX_FILE: &str = "forms_single.idx";
/// 同形異義表層形索引のファイル名
pub const MULTI_INDEX_FILE: &str = "forms_multi.idx";

/// 照会用の読み取り専用辞書
///
/// [`DictionaryBuilder`]で構築するか、[`Dictionary::from_path`]で
/// 保存済みのディレクトリから読み込みます。構築後は不変であり、
/// 参照共有だけで並行検索に使えます。
pub struct Dictionary {
    storage: Storage,
    paradigms: Vec<Vec<u16>>,
    single: SingleFormIndex,
    multi: MultiFormIndex,
}

impl Dictionary {
    /// 構築済みのコンポーネントから辞書を作成します。
    pub(crate) fn new(
        storage: Storage,
        paradigms: Vec<Vec<u16>>,
        single: SingleFormIndex,
        multi: MultiFormIndex,
    ) -> Self {
        Self {
            storage,
            paradigms,
            single,
            multi,
        }
    }

    /// インターンされたテーブルへの参照を返します。
    #[inline(always)]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// パラダイム一覧への参照を返します。IDは1始まりです。
    #[inline(always)]
    pub fn paradigms(&self) -> &[Vec<u16>] {
        &self.paradigms
    }

    /// 表層形に対応する単語IDの一覧を返します。
    ///
    /// まず単独索引を引き、次に同形異義索引を引きます。どちらにも
    /// 見つからない場合は空の一覧を返します。
    pub fn form_word_ids(&self, form: &str) -> Vec<u32> {
        if let Some(id) = self.single.get(form) {
            return vec![id];
        }
        if let Some(ids) = self.multi.get(form) {
            return ids.collect();
        }
        Vec::new()
    }

    /// 単語IDから[`Word`]を復元します。
    ///
    /// # エラー
    ///
    /// IDが範囲外の場合、または辞書データが破損している場合にエラーを
    /// 返します。
    pub fn decode_word(&self, word_id: u32) -> Result<Word> {
        let entry = self.storage.word(word_id)?;
        Word::decode(entry, &self.storage, &self.paradigms)
    }

    /// 辞書をディレクトリに保存します。
    ///
    /// # 引数
    ///
    /// * `dir` - 保存先ディレクトリ（存在しない場合は作成されます）
    ///
    /// # エラー
    ///
    /// 入出力エラーが発生した場合にエラーを返します。
    pub fn write_to_dir<P>(&self, dir: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        self.storage.write(
            BufWriter::new(File::create(dir.join(PREFIXES_FILE))?),
            BufWriter::new(File::create(dir.join(SUFFIXES_FILE))?),
            BufWriter::new(File::create(dir.join(GRAMMEMES_FILE))?),
            BufWriter::new(File::create(dir.join(TAG_GROUPS_FILE))?),
            BufWriter::new(File::create(dir.join(WORDS_FILE))?),
        )?;

        {
            use std::io::Write;
            let mut wtr = BufWriter::new(File::create(dir.join(PARADIGMS_FILE))?);
            for packed in &self.paradigms {
                writeln!(wtr, "{}", paradigm::canonical_key(packed))?;
            }
        }

        self.single
            .write(BufWriter::new(File::create(dir.join(SINGLE_INDEX_FILE))?))?;
        self.multi
            .write(BufWriter::new(File::create(dir.join(MULTI_INDEX_FILE))?))?;
        Ok(())
    }

    /// リーダー群から辞書を読み込みます。
    ///
    /// ファイルパスが使えない場合（メモリ上のバッファからの読み込みなど）
    /// のための入り口です。
    ///
    /// # 引数
    ///
    /// * `prefix_rdr`/`suffix_rdr`/`grammeme_rdr`/`tag_group_rdr`/`word_rdr`
    ///   - テーブルファイルのリーダー
    /// * `paradigm_rdr` - パラダイム一覧のリーダー
    /// * `single_rdr`/`multi_rdr` - 索引ブロブのリーダー
    ///
    /// # エラー
    ///
    /// いずれかの内容が不正な場合にエラーを返します。
    #[allow(clippy::too_many_arguments)]
    pub fn from_readers<P, S, G, T, W, D, I, M>(
        prefix_rdr: P,
        suffix_rdr: S,
        grammeme_rdr: G,
        tag_group_rdr: T,
        word_rdr: W,
        paradigm_rdr: D,
        single_rdr: I,
        multi_rdr: M,
    ) -> Result<Self>
    where
        P: Read,
        S: Read,
        G: Read,
        T: Read,
        W: Read,
        D: Read,
        I: Read,
        M: Read,
    {
        let storage = Storage::from_readers(
            prefix_rdr,
            suffix_rdr,
            grammeme_rdr,
            tag_group_rdr,
            word_rdr,
        )?;

        let mut paradigms = Vec::new();
        for line in BufReader::new(paradigm_rdr).lines() {
            paradigms.push(paradigm::parse_line(&line?)?);
        }

        let single = SingleFormIndex::read(single_rdr)?;
        let multi = MultiFormIndex::read(multi_rdr)?;

        let dict = Self::new(storage, paradigms, single, multi);
        dict.verify()?;

        info!(
            "Dictionary loaded: prefixes: {}, suffixes: {}, grammemes: {}, tag groups: {}, words: {}, paradigms: {}",
            dict.storage.num_prefixes(),
            dict.storage.num_suffixes(),
            dict.storage.num_grammemes(),
            dict.storage.num_tag_groups(),
            dict.storage.num_words(),
            dict.paradigms.len(),
        );
        Ok(dict)
    }

    /// ディレクトリから辞書を読み込みます。
    ///
    /// # 引数
    ///
    /// * `dir` - [`Dictionary::write_to_dir`]で保存されたディレクトリ
    ///
    /// # エラー
    ///
    /// いずれかのリソースが欠けている、または破損している場合にエラーを
    /// 返します。辞書が構築できないのは致命的な状態であり、呼び出し側で
    /// 回復することはできません。
    pub fn from_path<P>(dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let open = |name: &str| -> Result<BufReader<File>> {
            Ok(BufReader::new(File::open(dir.join(name))?))
        };
        Self::from_readers(
            open(PREFIXES_FILE)?,
            open(SUFFIXES_FILE)?,
            open(GRAMMEMES_FILE)?,
            open(TAG_GROUPS_FILE)?,
            open(WORDS_FILE)?,
            open(PARADIGMS_FILE)?,
            open(SINGLE_INDEX_FILE)?,
            open(MULTI_INDEX_FILE)?,
        )
    }

    /// 辞書内部の参照整合性を検証します。
    ///
    /// パラダイム中の接頭辞・接尾辞・タググループIDと、単語レコードの
    /// パラダイムIDがすべてテーブルの範囲内にあることを確認します。
    /// これにより、検証済みの辞書に対する復元操作は失敗しません。
    fn verify(&self) -> Result<()> {
        for packed in &self.paradigms {
            if packed.len() % 4 != 0 {
                return Err(MorfemaError::invalid_format(
                    "paradigms",
                    "Paradigm length must be a multiple of four",
                ));
            }
            for rule in paradigm::decode(packed) {
                self.storage.prefix(rule.prefix)?;
                self.storage.suffix(rule.suffix)?;
                self.storage.tag_group(rule.tag_group)?;
            }
        }
        for id in 1..=self.storage.num_words() {
            let entry = self.storage.word(u32::try_from(id)?)?;
            if usize::from(entry.paradigm_id) > self.paradigms.len() {
                return Err(MorfemaError::invalid_format(
                    "words",
                    format!("Paradigm id out of range: {}", entry.paradigm_id),
                ));
            }
        }
        Ok(())
    }
}
