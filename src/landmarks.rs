//! Built-in landmark content feed

use crate::config::LandmarkSpec;
use crate::consts::{LANDMARK_HEIGHT, LANDMARK_WIDTH};

/// (name, world x, English, German, image slug)
const TOUR: &[(&str, f32, &str, &str, &str)] = &[
    (
        "Brandenburger Tor",
        1400.0,
        "Completed in 1791, the Brandenburg Gate stood in no man's land for decades and became the symbol of German reunification.",
        "Das 1791 fertiggestellte Brandenburger Tor stand jahrzehntelang im Niemandsland und wurde zum Symbol der deutschen Wiedervereinigung.",
        "brandenburger-tor",
    ),
    (
        "Reichstag",
        3800.0,
        "Seat of the Bundestag since 1999. Its walk-in glass dome lets visitors look down into the plenary chamber.",
        "Seit 1999 Sitz des Bundestages. Von der begehbaren Glaskuppel aus blicken Besucher in den Plenarsaal.",
        "reichstag",
    ),
    (
        "Fernsehturm",
        6600.0,
        "At 368 metres the TV tower on Alexanderplatz is the tallest structure in Germany.",
        "Mit 368 Metern ist der Fernsehturm am Alexanderplatz das höchste Bauwerk Deutschlands.",
        "fernsehturm",
    ),
    (
        "East Side Gallery",
        9800.0,
        "A 1.3 km stretch of the Berlin Wall along the Spree, painted by artists from all over the world.",
        "Ein 1,3 km langes Stück der Berliner Mauer an der Spree, bemalt von Künstlern aus aller Welt.",
        "east-side-gallery",
    ),
    (
        "Museumsinsel",
        13200.0,
        "Five world-class museums on an island in the Spree, a UNESCO World Heritage Site. You made it to the end of the tour!",
        "Fünf Museen von Weltrang auf einer Insel in der Spree, UNESCO-Welterbe. Du hast das Ziel der Tour erreicht!",
        "museumsinsel",
    ),
];

/// The shipped tour; the last entry is the final landmark
pub fn default_landmarks() -> Vec<LandmarkSpec> {
    let last = TOUR.len().saturating_sub(1);
    TOUR.iter()
        .enumerate()
        .map(|(i, (name, world_x, en, de, slug))| LandmarkSpec {
            name: name.to_string(),
            world_x: *world_x,
            width: LANDMARK_WIDTH,
            height: LANDMARK_HEIGHT,
            description_en: en.to_string(),
            description_de: de.to_string(),
            is_final: i == last,
            image: Some(format!("images/landmarks/{slug}.png")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tour_is_ordered_and_ends_with_final() {
        let tour = default_landmarks();
        assert!(tour.windows(2).all(|w| w[0].world_x < w[1].world_x));
        assert!(tour.last().is_some_and(|l| l.is_final));
        assert_eq!(tour.iter().filter(|l| l.is_final).count(), 1);
    }

    #[test]
    fn test_every_landmark_is_bilingual() {
        for landmark in default_landmarks() {
            assert!(!landmark.description_en.is_empty(), "{}", landmark.name);
            assert!(!landmark.description_de.is_empty(), "{}", landmark.name);
        }
    }
}
