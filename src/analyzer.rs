//! 形態素解析のファサード
//!
//! このモジュールは、読み込み済みの[`Dictionary`]を所有し、トークン化・
//! レンマ化・単語情報の照会を提供する[`Analyzer`]を定義します。
//!
//! すべての照会は全域的です。辞書に存在しない語を引いてもエラーには
//! ならず、入力そのものを唯一の語形とする合成の[`Word`]が返ります。

use crate::dictionary::{Dictionary, WordEntry};
use crate::errors::Result;
use crate::utils;
use crate::word::Word;

/// 形態素解析器
///
/// 構築後は内部状態を一切変更しないため、参照共有だけで任意数の
/// 並行照会に使えます。
///
/// # 使用例
///
/// ```
/// use morfema::{Analyzer, DictionaryBuilder};
///
/// # fn main() -> morfema::errors::Result<()> {
/// let corpus = "\
/// стол|сущ муж ед им|сто'л
/// стола|сущ муж ед род|стола'
/// столы|сущ муж мн им|столы'
/// ";
/// let analyzer = Analyzer::new(DictionaryBuilder::from_corpus(corpus.as_bytes())?);
///
/// let lemmas = analyzer.lemmatize("столы")?;
/// assert_eq!(lemmas, vec!["стол"]);
/// # Ok(())
/// # }
/// ```
pub struct Analyzer {
    dict: Dictionary,
}

impl Analyzer {
    /// 辞書から解析器を作成します。
    pub fn new(dict: Dictionary) -> Self {
        Self { dict }
    }

    /// 内部の辞書への参照を返します。
    #[inline(always)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// 表層形に対応する単語の一覧を返します。
    ///
    /// 入力は前後の空白を除去して小文字化されます。辞書に存在しない
    /// 表層形の場合は、入力そのものを語幹とし空のパラダイムを持つ
    /// 合成の単語が1つ返ります。したがってこの照会が「見つからない」
    /// ことはありません。
    ///
    /// # エラー
    ///
    /// 辞書データが破損している場合にのみエラーを返します。検証済みの
    /// 辞書ではエラーになりません。
    pub fn word_info(&self, word: &str) -> Result<Vec<Word>> {
        let normalized = word.trim().to_lowercase();
        let ids = self.dict.form_word_ids(&normalized);
        if ids.is_empty() {
            let entry = WordEntry {
                stem: normalized,
                paradigm_id: 0,
            };
            return Ok(vec![Word::decode(
                &entry,
                self.dict.storage(),
                self.dict.paradigms(),
            )?]);
        }
        ids.into_iter().map(|id| self.dict.decode_word(id)).collect()
    }

    /// 表層形の見出し語（辞書形）の一覧を返します。
    ///
    /// 同形異義語はそれぞれの見出し語を与えるため、結果は複数になる
    /// ことがあります。重複は除去され、順序は決定的です。
    pub fn lemmatize(&self, word: &str) -> Result<Vec<String>> {
        let mut lemmas: Vec<String> = Vec::new();
        for info in self.word_info(word)? {
            let lemma = info.lemma().surface().to_string();
            if !lemmas.contains(&lemma) {
                lemmas.push(lemma);
            }
        }
        Ok(lemmas)
    }

    /// テキストをキリル文字の語のトークン列に分割します。
    ///
    /// 小文字化したうえで、キリル文字とハイフン以外の並びを区切りとして
    /// 分割します。空のトークンとハイフンだけのトークンは含まれません。
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        utils::split_tokens(text)
    }

    /// 表層形が指定の見出し語を持つかどうかを判定します。
    pub fn has_lemma(&self, word: &str, lemma: &str) -> Result<bool> {
        let lemma = lemma.trim().to_lowercase();
        Ok(self.lemmatize(word)?.iter().any(|l| *l == lemma))
    }

    /// 表層形が指定の見出し語のいずれかを持つかどうかを判定します。
    pub fn has_one_of_lemmas(&self, word: &str, lemmas: &[&str]) -> Result<bool> {
        let found = self.lemmatize(word)?;
        Ok(lemmas
            .iter()
            .any(|lemma| found.iter().any(|l| *l == lemma.trim().to_lowercase())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryBuilder;

    const CORPUS: &str = "\
сталь|сущ жен ед им|ста'ль
стали|сущ жен ед род|ста'ли

стать|гл инф|ста'ть
стали|гл прош мн|ста'ли

попугай|сущ муж ед им|попуга'й
попугаи|сущ муж мн им|попуга'и
";

    fn analyzer() -> Analyzer {
        Analyzer::new(DictionaryBuilder::from_corpus(CORPUS.as_bytes()).unwrap())
    }

    #[test]
    fn test_word_info_known() {
        let analyzer = analyzer();
        let infos = analyzer.word_info("попугаи").unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].lemma().surface(), "попугай");
    }

    #[test]
    fn test_word_info_homonym() {
        let analyzer = analyzer();
        let infos = analyzer.word_info("стали").unwrap();
        assert_eq!(infos.len(), 2);
    }

    #[test]
    fn test_word_info_unknown_is_total() {
        let analyzer = analyzer();
        let infos = analyzer.word_info("сепулька").unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].lemma().surface(), "сепулька");
        assert_eq!(infos[0].forms().len(), 1);
    }

    #[test]
    fn test_word_info_normalizes_input() {
        let analyzer = analyzer();
        let infos = analyzer.word_info("  Попугаи ").unwrap();
        assert_eq!(infos[0].lemma().surface(), "попугай");
    }

    #[test]
    fn test_lemmatize_homonym() {
        let analyzer = analyzer();
        let lemmas = analyzer.lemmatize("стали").unwrap();
        assert_eq!(lemmas.len(), 2);
        assert!(lemmas.contains(&"сталь".to_string()));
        assert!(lemmas.contains(&"стать".to_string()));
    }

    #[test]
    fn test_has_lemma() {
        let analyzer = analyzer();
        assert!(analyzer.has_lemma("попугаи", "попугай").unwrap());
        assert!(analyzer.has_lemma("стали", "сталь").unwrap());
        assert!(analyzer.has_lemma("стали", "стать").unwrap());
        assert!(!analyzer.has_lemma("стали", "попугай").unwrap());
    }

    #[test]
    fn test_has_one_of_lemmas() {
        let analyzer = analyzer();
        assert!(analyzer
            .has_one_of_lemmas("стали", &["сталь", "попугай"])
            .unwrap());
        assert!(!analyzer.has_one_of_lemmas("стали", &["попугай"]).unwrap());
    }

    #[test]
    fn test_tokenize() {
        let analyzer = analyzer();
        assert_eq!(
            analyzer.tokenize("Попугаи стали серыми."),
            vec!["попугаи", "стали", "серыми"]
        );
    }
}
