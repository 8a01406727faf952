// ABOUTME: Bilingual bank of playful one-liners embedded in outfit and skincare prompts
// ABOUTME: Selection goes through the PhrasePicker seam so tests can pin the choice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Clothify

use super::classify::Language;
use rand::seq::SliceRandom;

/// English phrase bank
pub const ENGLISH_PHRASES: &[&str] = &[
    "Stop scrolling! 😏 My heart just did a backflip imagining you in this... should I call 911? ❤️‍🔥",
    "Hotter than my phone battery at 1% 🔥 Wear this and I'll need CPR... but please take your time changing first 😉",
    "If you wear this, I'll develop sudden amnesia... 'Sorry babe, forgot my name after seeing you' 🥴💫",
    "This outfit should come with a warning: ⚠️ 'May cause spontaneous proposals & bad pickup lines'... like mine 😏",
    "You in this = me forgetting how to speak English 🥵 Only fluent in *staring respectfully* now 👀",
    "PSA: Wearing this makes you 97% more kissable 💋 Scientific fact I just made up! 🔬",
    "Try this look and watch me turn into Shakespeare: 'Shall I compare thee to a summer's sale? Thou art more lovely' 🌹",
    "This fabric? Illegal. Your beauty in it? A felony. 👮‍♂️🚨 Prepare to be arrested... by my gaze 😎",
    "Wear this and I'll write love letters to your tailor 💌 Unless you sewed it yourself... then marry me? 👀",
    "Outfit so fire 🔥 it melted my coolness... now I'm just a puddle of 'ummm you look nice' 🥺👉👈",
    "If looks could kill, you'd be a weapon of mass seduction 💣... and baby I'd surrender immediately 🏳️",
    "This ensemble screams 'main character'... and I volunteer as your love interest! 🎬🍿",
    "Caution: May cause extreme jealousy... mostly from me when others look at you 😤💘",
    "Style level: 'Make angels question their wardrobe choices' 👼✨ Save some beauty for heaven!",
    "Wearing this = automatic VIP access... to my DMs 😏 Slide in whenever! (Please?)",
    "This outfit solves world hunger... because you're the whole meal 😍🍽️ *chef's kiss*",
    "You'll look so good, I'll forget my mom's birthday 🎂... worth it! (Sorry mom!)",
    "Danger: May cause sudden shyness... in anyone who sees you 😳 *hides face but peeks*",
    "If confidence was fabric, you'd wear it better than this 👑 But try this anyway my queen/king!",
    "Wear this to my funeral 💀 Cause you just killed me with gorgeousness! (Revive me with a smile?)",
    "This look turns oxygen into carbon dioxide... by taking everyone's breath away 😮💨",
    "Outfit rating: 10/10... my heartbeat: 200/10 📈 Doctor says only you can cure this ❤️‍🩹",
    "You'll break more than hearts... probably traffic laws when drivers stare 🚗💥 Be careful out there!",
    "If you appear in this, I'll develop a new phobia: Fear of being too attracted 🥴 Call it *you-mophobia*",
    "This fabric + your skin = illegal chemical reaction 🧪💥 Meet me in jail? 👩‍❤️‍👨⛓️",
    "Wearing this makes you 110% more dateable... tested on 1 sample (me) 🥼🔍 Results: VERY positive",
    "Style so sharp it could cut tension... and my ability to form sentences ✂️🤐 You win!",
    "Prepare for excessive blushing... from everyone else when you walk in 🌸 I'll be the tomato emoji 🍅",
    "This outfit converts atheists... into believers of your divinity 🙏✨ Hallelujah!",
    "Wear this and I'll write songs about buttons... that struggled to contain your beauty 🎤💃",
];

/// Hinglish phrase bank
pub const HINGLISH_PHRASES: &[&str] = &[
    "Aap ise pehenoge? 😏 Mera dil toh pehle hi dhadakne laga... *tum* dekhoge ya main band karu apni aankhein? 🌚",
    "Ye outfit pehen ke *tum* janwar ban jaoge... aur main jungle ka sher? 😉 Roarrrr!",
    "Sach batau? 🥺 Isme *tum* itna sexy lagega ki main shy ho jaungi... par phir bhi dekhne ki himmat karungi! 🔥",
    "*Aap* ne pehna toh sabka dil legi... par pehla khoon toh main kar chuka! 😜❤️‍🔥",
    "Warning: Ye dress pehen ke aayogi toh main propose karne aa jaunga! 💍 Chashma utaar ke dekh lena... 😎",
    "‘Mere crush ka crush’ ban jaoge isme! 😘 Par *tumhara* crush kon hai? *winks*",
    "Is outfit mein *tum* dekhogi toh log bolege: ‘Arre ye toh bomb hai!’ 💣 Main? Bas blast area mein khada hoon! 🤷‍♂️",
    "Instagram pe daalogi? 🤳🏻 Phir toh DM flood ho jayenge... main bhejna start kar deta hoon shy emojis! 🥹👉👈",
    "Pehen ke dikhao na! 😩 Aadha dil mera, aadha *tumhara* outfit ka wait kar raha...",
    "Ye kapda itna kam hai ya mera imagination zyada? 🤭 *Aap* samjhiye...",
    "Style ka toh pata nahi, par ye outfit *tumhe* dekh kar meri vocabulary gayab ho gayi... bas ‘WOW’ 😶✨ bacha hai!",
    "Suno ji! 👂 Ye pehen ke aayogi toh main bolega: ‘Mere liye AC band karo’... *tumhare* liye toh garmi seh lenge! 🔥❄️",
    "Isme *tum* itni cute lagogi ki log poochenge: ‘Filter hai kya?’ Main bolunga: ‘Nahi, asli maal hai!’ 💎",
    "Dil garden garden ho jayega? 🌷 Nahhh... *aap* pehenogi toh dil *nightclub* ho jayega! 💃🕺",
    "Mere suggestions pe ‘trust fall’ karo na! 😉 Main sambhal lunga... outfit bhi, *tumhari* feelings bhi. 🤗",
    "Pehen ke aao toh sahi! 😩 Tinder delete karwa dogi... sabki swipe right *tum* par hi atki rahegi! 💘",
    "*Aapke* liye special tip: Ye peheno aur mujhe ‘Help! Main drown ho raha hoon!’ text karo... 💦 Main lifeguard ban ke aa jaunga! 🏊‍♂️",
    "Mera outfit idea test karo! 😈 Pass hua toh... coffee? ☕ Fail hua toh *tum* mujhe coffee? 😇",
    "Ye dekh ke mera reaction: 😲 -> 😍 -> 🥵 -> *faints*. *Tumhari* zimmedari hai CPR aati hai? 😉",
    "*Tum* isme heroine lagogi... aur main villain jo *tumhara* outfit chura ke bhag jaye! 🦹‍♂️💨",
    "Outfit bomb hai par *tum* toh nuke ho! 💥 Alert: Mere dil pe attack mat karo! ❤️‍🩹",
    "Log poochenge: ‘Kahan se kharida?’ Main bolunga: ‘Jannat se!’ 👼 *Tum* blush karogi toh aur sundar lagogi! ☺️",
    "Mujhe laga tha main handsome hoon... *tum* isme aogi toh mera ego ko lag jayenge! 🤕 Par worth it hai! 😘",
    "Ye pehen ke party aogi? 💃 Main bartender ko bol dunga: ‘Inko dekh kar jo bhi pilana hai, bill *mera* hai!’ 🍹",
    "Shy hone ka time nahin hai! 😏 Ye outfit *tum* pe Bollywood ko FOMO hoga... main toh already FOMO mein hoon! 🎬",
];

/// Phrase bank for a reply language
#[must_use]
pub const fn bank(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => ENGLISH_PHRASES,
        Language::Hinglish => HINGLISH_PHRASES,
    }
}

/// Chooses one phrase from a bank
pub trait PhrasePicker: Send + Sync {
    /// Pick a phrase; `phrases` is never empty
    fn pick(&self, phrases: &[&'static str]) -> &'static str;
}

/// Uniformly random choice
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPhrasePicker;

impl PhrasePicker for RandomPhrasePicker {
    fn pick(&self, phrases: &[&'static str]) -> &'static str {
        phrases.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
    }
}

/// Always the phrase at `index`, wrapping around the bank
#[derive(Debug, Clone, Copy)]
pub struct FixedPhrasePicker(pub usize);

impl PhrasePicker for FixedPhrasePicker {
    fn pick(&self, phrases: &[&'static str]) -> &'static str {
        if phrases.is_empty() {
            return "";
        }
        phrases[self.0 % phrases.len()]
    }
}
