//! Title banner with a random tax slogan

use leptos::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::SLOGANS;

/// Pick one slogan from the fixed list.
pub fn pick_slogan<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SLOGANS.choose(rng).copied().unwrap_or(SLOGANS[0])
}

#[component]
pub fn Banner() -> impl IntoView {
    let slogan = pick_slogan(&mut rand::thread_rng());

    view! {
        <header class="banner">
            <a href="#" class="logo">"LEDGERFLAT"</a>
            <div class="slogan">{slogan}</div>
            <p class="subtitle">
                "Drop a ledger CSV: multi-line cells are split into one row per leg, "
                "ready to download as a clean CSV."
            </p>
        </header>
    }
}
