pub mod outfits;
pub mod wardrobe;
