//! エンドツーエンドのテスト
//!
//! コーパスから辞書を構築し、保存・読み込みを経て照会結果を検証します。

use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::grammar::{Case, Gender, Number, Person, Tense};
use crate::Analyzer;

const CORPUS: &str = "\
красивый|прл муж ед им|краси'вый
красивая|прл жен ед им|краси'вая
красивой|прл жен ед род|краси'вой
красивую|прл жен ед вин|краси'вую
красивые|прл мн им|краси'вые
красивых|прл мн род|краси'вых

еж|сущ муж ед им|ё'ж
ежа|сущ ед род|ежа'
ежи|сущ мн им|ежи'
ежей|сущ мн род|еже'й

сталь|сущ жен ед им|ста'ль
стали|сущ ед род|ста'ли
стали|сущ мн им|ста'ли

стать|гл инф|ста'ть
стал|гл прош муж ед|ста'л
стали|гл прош мн|ста'ли
";

fn analyzer() -> Analyzer {
    Analyzer::new(DictionaryBuilder::from_corpus(CORPUS.as_bytes()).unwrap())
}

#[test]
fn test_closest_form_scenario() {
    let analyzer = analyzer();
    let infos = analyzer.word_info("красивый").unwrap();
    assert_eq!(infos.len(), 1);
    let word = &infos[0];

    let feminine_nominative = word
        .closest_form(
            Gender::Feminine,
            Case::Nominative,
            Number::Singular,
            Tense::None,
            Person::None,
            false,
            false,
        )
        .unwrap();
    assert_eq!(feminine_nominative.surface(), "красивая");

    let feminine_accusative = word
        .closest_form(
            Gender::Feminine,
            Case::Accusative,
            Number::Singular,
            Tense::None,
            Person::None,
            false,
            false,
        )
        .unwrap();
    assert_eq!(feminine_accusative.surface(), "красивую");

    let genitive_plural = word
        .closest_form(
            Gender::None,
            Case::Genitive,
            Number::Plural,
            Tense::None,
            Person::None,
            false,
            false,
        )
        .unwrap();
    assert_eq!(genitive_plural.surface(), "красивых");
}

#[test]
fn test_closest_form_exact_match_returns_none() {
    let analyzer = analyzer();
    let infos = analyzer.word_info("красивый").unwrap();
    let missing = infos[0].closest_form(
        Gender::Masculine,
        Case::Accusative,
        Number::Plural,
        Tense::None,
        Person::None,
        true,
        false,
    );
    assert!(missing.is_none());
}

#[test]
fn test_lookup_is_total() {
    let analyzer = analyzer();
    let infos = analyzer.word_info("сепулькарий").unwrap();
    assert_eq!(infos.len(), 1);
    let word = &infos[0];
    assert_eq!(word.stem(), "сепулькарий");
    assert_eq!(word.forms().len(), 1);
    assert_eq!(word.lemma().surface(), "сепулькарий");
}

#[test]
fn test_gender_backfill_through_pipeline() {
    let analyzer = analyzer();
    let infos = analyzer.word_info("сталь").unwrap();
    let word = &infos[0];
    for form in word.forms() {
        assert_eq!(form.tag().gender, Gender::Feminine);
    }
}

#[test]
fn test_homonym_lemmatization() {
    let analyzer = analyzer();
    let lemmas = analyzer.lemmatize("стали").unwrap();
    assert_eq!(lemmas.len(), 2);
    assert!(lemmas.contains(&"сталь".to_string()));
    assert!(lemmas.contains(&"стать".to_string()));
}

#[test]
fn test_yo_spelling_resolves_to_same_word() {
    let analyzer = analyzer();
    let with_yo = analyzer.word_info("ёж").unwrap();
    let without_yo = analyzer.word_info("еж").unwrap();
    assert_eq!(with_yo.len(), 1);
    assert_eq!(without_yo.len(), 1);
    assert_eq!(
        with_yo[0].lemma().surface(),
        without_yo[0].lemma().surface()
    );
    assert!(analyzer.has_lemma("ежи", "ёж").unwrap());
}

#[test]
fn test_save_load_answers_identically() {
    let built = DictionaryBuilder::from_corpus(CORPUS.as_bytes()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    built.write_to_dir(dir.path()).unwrap();
    let loaded = Dictionary::from_path(dir.path()).unwrap();

    let before = Analyzer::new(built);
    let after = Analyzer::new(loaded);

    for query in ["красивую", "стали", "ёж", "неизвестное"] {
        let a = before.word_info(query).unwrap();
        let b = after.word_info(query).unwrap();
        assert_eq!(a.len(), b.len(), "query: {query}");
        for (x, y) in a.iter().zip(&b) {
            let xs: Vec<&str> = x.forms().iter().map(|f| f.surface()).collect();
            let ys: Vec<&str> = y.forms().iter().map(|f| f.surface()).collect();
            assert_eq!(xs, ys, "query: {query}");
        }
    }
}

#[test]
fn test_permuted_corpus_gives_same_paradigm() {
    // 見出し行以外の順序を入れ替えた同じブロックは、同一のパラダイム
    // 配列に正規化される
    let permuted = "\
красивый|прл муж ед им|краси'вый
красивых|прл мн род|краси'вых
красивая|прл жен ед им|краси'вая
красивые|прл мн им|краси'вые
красивой|прл жен ед род|краси'вой
красивую|прл жен ед вин|краси'вую
";
    let original = "\
красивый|прл муж ед им|краси'вый
красивая|прл жен ед им|краси'вая
красивой|прл жен ед род|краси'вой
красивую|прл жен ед вин|краси'вую
красивые|прл мн им|краси'вые
красивых|прл мн род|краси'вых
";
    let combined = format!("{original}\n{permuted}");
    let dict = DictionaryBuilder::from_corpus(combined.as_bytes()).unwrap();
    assert_eq!(dict.paradigms().len(), 1);
    assert_eq!(dict.storage().num_words(), 1);
}
