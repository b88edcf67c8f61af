use rand::seq::SliceRandom;

/// Served whenever generation fails. Same style rules as the prompt: no
/// "ти/твій", no "сьогодні".
pub const FALLBACK_PREDICTIONS: [&str; 8] = [
    "Зорі підказують: саме час для сміливих планів та смачної кави.",
    "Рівень удачі максимальний: всі світлофори будуть зеленими.",
    "Рецепт дня: побільше посмішок і жодних зайвих турбот.",
    "Час повірити в диво та власні сили!",
    "Енергія просто зашкалює! Всі перешкоди долаються легко.",
    "Магія вже в повітрі — лови момент!",
    "Всесвіт шепоче: все складеться найкращим чином.",
    "Час діяти! Успіх вже чекає за рогом.",
];

/// Uniformly chosen fallback prediction.
pub fn random_fallback() -> &'static str {
    FALLBACK_PREDICTIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_PREDICTIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn always_from_the_list() {
        for _ in 0..100 {
            assert!(FALLBACK_PREDICTIONS.contains(&random_fallback()));
        }
    }

    #[test]
    fn eventually_covers_every_entry() {
        let seen: HashSet<_> = (0..2_000).map(|_| random_fallback()).collect();
        assert_eq!(seen.len(), FALLBACK_PREDICTIONS.len());
    }
}
