use std::path::PathBuf;

use outfit_ai::workflows::outfits::{
    Category, GenerationRequest, JudgeSettings, Material, OutfitJudge, OutfitPipeline, RuleMode,
    WeatherCondition, WeatherContext,
};
use outfit_ai::workflows::outfits::{CompletionClient, CompletionRequest, JudgeError};
use outfit_ai::workflows::wardrobe::{WardrobeImportError, WardrobeImporter};

fn demo_wardrobe() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/wardrobe.csv")
}

struct Offline;

#[async_trait::async_trait]
impl CompletionClient for Offline {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, JudgeError> {
        Err(JudgeError::MissingCredential)
    }
}

#[test]
fn importer_reads_inline_exports() {
    let csv = "id,name,category,primary_color,material,seasonality,tags\n\
t1,Linen shirt,top,White,linen,summer,breezy; Vacation\n\
s1,Rain boots,shoes,black,,,\n";

    let garments = WardrobeImporter::from_reader(csv.as_bytes()).expect("import succeeds");

    assert_eq!(garments.len(), 2);
    assert_eq!(garments[0].material, Material::Linen);
    assert_eq!(garments[0].primary_color, "white");
    assert!(garments[0].has_tag("vacation"));
    assert_eq!(garments[1].category, Category::Shoes);
    assert!(garments[1].tags.is_empty());
}

#[test]
fn importer_rejects_unknown_formality() {
    let csv = "id,name,category,primary_color,formality\nt1,Tee,top,white,black tie\n";

    let err = WardrobeImporter::from_reader(csv.as_bytes()).expect_err("unknown formality");

    assert!(matches!(
        err,
        WardrobeImportError::InvalidField {
            line: 2,
            field: "formality",
            ..
        }
    ));
}

#[tokio::test]
async fn demo_wardrobe_generates_outfits_offline() {
    let wardrobe = WardrobeImporter::from_path(demo_wardrobe()).expect("demo wardrobe loads");
    assert_eq!(wardrobe.len(), 13);

    let mut request = GenerationRequest::new(wardrobe);
    request.weather = Some(WeatherContext::new(48.0, WeatherCondition::Rainy));
    request.config.seed = Some(1);
    assert_eq!(request.rule_mode(), RuleMode::Normal);

    let pipeline = OutfitPipeline::new(OutfitJudge::new(Offline, JudgeSettings::default()));
    let outfits = pipeline.generate(request).await.expect("demo generates");

    assert!(!outfits.is_empty());
    for outfit in &outfits {
        assert_ne!(outfit.candidate.shoes.id.as_str(), "sandals-tan");
        assert_ne!(outfit.candidate.bottom.id.as_str(), "shorts-olive");
    }
}
