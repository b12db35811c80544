//! 辞書構築のためのビルダー
//!
//! このモジュールは、生のコーパス（空行で区切られた語形変化表のブロック列）
//! から[`Dictionary`]を構築するビルダーを提供します。
//!
//! 各ブロックについて語幹・規則抽出を実行し、正規化キーでパラダイムを
//! 重複排除し、`(語幹, パラダイムID)`レコードをインターンして、復元される
//! すべての表層形（別綴りを含む）を単語IDへの索引に登録します。

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};

use hashbrown::HashMap;
use log::{debug, info};

use crate::dictionary::form_index::{MultiFormIndex, SingleFormIndex};
use crate::dictionary::generator;
use crate::dictionary::paradigm;
use crate::dictionary::storage::Storage;
use crate::dictionary::Dictionary;
use crate::errors::Result;
use crate::utils;

/// 進捗ログを出す行間隔
const PROGRESS_INTERVAL: usize = 10_000;

/// 生のコーパスから[`Dictionary`]を構築するビルダー
#[derive(Default)]
pub struct DictionaryBuilder {
    storage: Storage,
    paradigms: Vec<Vec<u16>>,
    paradigm_ids: HashMap<String, u16>,
    form_ids: BTreeMap<String, Vec<u32>>,
}

impl DictionaryBuilder {
    /// コーパスを読み込んで辞書を構築します。
    ///
    /// コーパスは行指向のUTF-8テキストで、1語分の語形変化表が空行で
    /// 区切られます。各行は `語形|文法素列|強勢記号付き語形` です。
    /// 行は前後の空白を除去したうえで小文字化されます。
    ///
    /// 見出し行が空、空白を含む、またはラテン文字を含むブロックは
    /// 読み飛ばされます（エラーではなくフィルタリング規則です）。
    ///
    /// # 引数
    ///
    /// * `rdr` - コーパスのリーダー
    ///
    /// # エラー
    ///
    /// 入出力エラー、またはテーブルのID空間を使い切った場合に
    /// エラーを返します。
    pub fn from_corpus<R>(rdr: R) -> Result<Dictionary>
    where
        R: Read,
    {
        let mut builder = Self::default();

        let mut lines: Vec<String> = Vec::new();
        let mut count = 0usize;
        for line in BufReader::new(rdr).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                // 空行は語の区切り。溜めた行を1語として書き出す
                builder.write_block(&lines)?;
                lines.clear();
            } else {
                lines.push(line.to_lowercase());
                count += 1;
                if count % PROGRESS_INTERVAL == 0 {
                    info!(
                        "Lines loaded: {}, paradigms: {}, prefixes: {}, suffixes: {}, tag groups: {}",
                        count,
                        builder.paradigms.len(),
                        builder.storage.num_prefixes(),
                        builder.storage.num_suffixes(),
                        builder.storage.num_tag_groups(),
                    );
                }
            }
        }
        builder.write_block(&lines)?;

        info!("Total corpus lines: {count}");
        builder.finish()
    }

    /// 1語分のブロックを処理します。
    fn write_block(&mut self, lines: &[String]) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        let headword = lines[0].split('|').next().unwrap_or("").trim();
        if headword.is_empty() || headword.contains(' ') || utils::contains_latin(headword) {
            debug!("Skipped block: {:?}", lines[0]);
            return Ok(());
        }

        let Some(generated) = generator::generate(lines, &mut self.storage)? else {
            return Ok(());
        };

        // 同一の変化型は1つのパラダイムIDを共有する。既登録のパラダイムを
        // 再利用することで、ビット単位で同一の配列が使われることを保証する
        let key = paradigm::canonical_key(&generated.paradigm);
        let paradigm_id = match self.paradigm_ids.get(&key) {
            Some(&id) => id,
            None => {
                let id = u16::try_from(self.paradigms.len() + 1)?;
                self.paradigms.push(generated.paradigm);
                self.paradigm_ids.insert(key, id);
                id
            }
        };

        let word_id = self.storage.intern_word(&generated.stem, paradigm_id)?;

        let packed = &self.paradigms[usize::from(paradigm_id) - 1];
        let mut forms = Vec::with_capacity(paradigm::num_rules(packed));
        for rule in paradigm::decode(packed) {
            forms.push(format!(
                "{}{}{}",
                self.storage.prefix(rule.prefix)?,
                generated.stem,
                self.storage.suffix(rule.suffix)?
            ));
        }
        for alt in &generated.alt_forms {
            if !alt.is_empty() && !forms.contains(alt) {
                forms.push(alt.clone());
            }
        }

        for form in forms {
            let ids = self.form_ids.entry(form).or_default();
            if !ids.contains(&word_id) {
                ids.push(word_id);
            }
        }
        Ok(())
    }

    /// 蓄積した内容から辞書を組み立てます。
    fn finish(self) -> Result<Dictionary> {
        self.storage.verify_grammemes()?;

        // 1レコードに解決される表層形と、同形異義の表層形を別の索引に
        // 分けて格納密度を上げる
        let mut single = BTreeMap::new();
        let mut multi = BTreeMap::new();
        for (form, ids) in self.form_ids {
            if ids.len() == 1 {
                single.insert(form, ids[0]);
            } else {
                multi.insert(form, ids);
            }
        }

        info!(
            "Dictionary built: words: {}, paradigms: {}, single forms: {}, homonymous forms: {}",
            self.storage.num_words(),
            self.paradigms.len(),
            single.len(),
            multi.len(),
        );

        let single = SingleFormIndex::from_map(&single)?;
        let multi = MultiFormIndex::from_map(&multi)?;
        Ok(Dictionary::new(self.storage, self.paradigms, single, multi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "\
стол|сущ муж ед им|сто'л
стола|сущ муж ед род|стола'
столы|сущ муж мн им|столы'

машина|сущ жен ед им|маши'на
машины|сущ жен ед род|маши'ны
машины|сущ жен мн им|маши'ны

only latin|сущ|latin
";

    #[test]
    fn test_build_from_corpus() {
        let dict = DictionaryBuilder::from_corpus(CORPUS.as_bytes()).unwrap();
        assert_eq!(dict.storage().num_words(), 2);
        assert_eq!(dict.form_word_ids("стол"), vec![1]);
        assert_eq!(dict.form_word_ids("столы"), vec![1]);
        assert_eq!(dict.form_word_ids("машины"), vec![2]);
        assert!(dict.form_word_ids("latin").is_empty());
    }

    #[test]
    fn test_identical_patterns_share_paradigm() {
        // 変化型が構造的に同一の2語は同じパラダイムIDを受け取る
        let corpus = "\
завод|сущ муж ед им|заво'д
завода|сущ муж ед род|заво'да

приход|сущ муж ед им|прихо'д
прихода|сущ муж ед род|прихо'да
";
        let dict = DictionaryBuilder::from_corpus(corpus.as_bytes()).unwrap();
        assert_eq!(dict.paradigms().len(), 1);
        let first = dict.storage().word(1).unwrap();
        let second = dict.storage().word(2).unwrap();
        assert_eq!(first.paradigm_id, second.paradigm_id);
    }

    #[test]
    fn test_homonymous_forms_partitioned_to_multi() {
        let corpus = "\
сталь|сущ жен ед им|ста'ль
стали|сущ жен ед род|ста'ли

стать|гл инф|ста'ть
стали|гл прош мн|ста'ли
";
        let dict = DictionaryBuilder::from_corpus(corpus.as_bytes()).unwrap();
        // 「стали」は両方の語に属するため複数索引に入る
        let ids = dict.form_word_ids("стали");
        assert_eq!(ids.len(), 2);
        // 一意な語形は単独索引に入る
        assert_eq!(dict.form_word_ids("сталь").len(), 1);
    }

    #[test]
    fn test_blocks_with_spaces_or_latin_are_skipped() {
        let corpus = "\
под столом|сущ|под столо'м

table|сущ|table

стол|сущ муж ед им|сто'л
";
        let dict = DictionaryBuilder::from_corpus(corpus.as_bytes()).unwrap();
        assert_eq!(dict.storage().num_words(), 1);
    }

    #[test]
    fn test_duplicate_blocks_share_word_entry() {
        let corpus = "\
стол|сущ муж ед им|сто'л
стола|сущ муж ед род|стола'

стол|сущ муж ед им|сто'л
стола|сущ муж ед род|стола'
";
        let dict = DictionaryBuilder::from_corpus(corpus.as_bytes()).unwrap();
        assert_eq!(dict.storage().num_words(), 1);
        assert_eq!(dict.form_word_ids("стол"), vec![1]);
    }

    #[test]
    fn test_alt_spelling_indexed() {
        let corpus = "\
еж|сущ муж ед им|ё'ж
ежи|сущ муж мн им|ежи'
";
        let dict = DictionaryBuilder::from_corpus(corpus.as_bytes()).unwrap();
        // ё綴りとе綴りの両方が同じレコードを指す
        assert_eq!(dict.form_word_ids("ёж"), dict.form_word_ids("еж"));
        assert!(!dict.form_word_ids("ёж").is_empty());
    }
}
