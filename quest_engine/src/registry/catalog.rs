//! Built-in quest template catalog.
//!
//! Title, description, and objective wording may carry the `{epithet}` and
//! `{approach}` substitution slots, resolved per archetype at instantiation.

use game_model::{FlagValue, NarrativeTheme, TriggerKind};

use crate::context::{AlignmentAxis, ConsequenceEffect, ConsequenceTag};
use crate::registry::{
    ChoiceTemplate, ObjectiveTemplate, Prerequisite, QuestTemplate, RewardTemplate,
};

/// The default template set, at least one template per theme.
pub fn builtin_templates() -> Vec<QuestTemplate> {
    vec![
        corruption_tainted_well(),
        discovery_sunken_archive(),
        betrayal_hollow_oath(),
        betrayal_double_agent(),
        redemption_debt_of_ash(),
        vengeance_blood_price(),
        protection_last_caravan(),
        forbidden_sealed_pages(),
        survival_long_winter(),
        power_empty_throne(),
        sacrifice_the_lantern(),
        corruption_whispering_idol(),
    ]
}

fn corruption_tainted_well() -> QuestTemplate {
    QuestTemplate::new(
        "corruption-tainted-well",
        NarrativeTheme::Corruption,
        "The Tainted Well",
        "The village well runs black, and only a {epithet} would dare trace \
         the rot to its source {approach}.",
    )
    .with_objective(ObjectiveTemplate::new("Trace the taint to its source", 1))
    .with_objective(ObjectiveTemplate::new("Destroy or seal the source", 1))
    .with_choice(
        ChoiceTemplate::new("Seal the source and warn the village")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: 0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Protection, 0.5)),
    )
    .with_choice(
        ChoiceTemplate::new("Draw the taint into yourself for its power")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: -0.2,
            })
            .with_effect(ConsequenceEffect::FlagWrite {
                key: "drank_the_taint".into(),
                value: FlagValue::Bool(true),
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Corruption, 0.8)),
    )
    .with_reward(RewardTemplate::new(120, 40))
    .with_triggers([TriggerKind::LocationEntered, TriggerKind::CorruptionThreshold])
}

fn corruption_whispering_idol() -> QuestTemplate {
    QuestTemplate::new(
        "corruption-whispering-idol",
        NarrativeTheme::Corruption,
        "The Whispering Idol",
        "An idol recovered from the deep roads murmurs promises meant for a \
         {epithet}. It wants to be carried somewhere.",
    )
    .with_objective(ObjectiveTemplate::new("Learn what the idol wants", 1))
    .with_objective(ObjectiveTemplate::new("Decide the idol's fate", 1))
    .with_choice(
        ChoiceTemplate::new("Shatter the idol unheard")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::OrderChaos,
                delta: 0.1,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Corruption, -0.6)),
    )
    .with_choice(
        ChoiceTemplate::new("Carry it where it asks")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: -0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Corruption, 0.7))
            .with_tag(ConsequenceTag::new(NarrativeTheme::ForbiddenKnowledge, 0.4)),
    )
    .with_reward(RewardTemplate::new(150, 0).with_item("Idol Shard"))
    .with_prerequisite(Prerequisite::MinCorruption(0.2))
    .with_triggers([TriggerKind::ItemAcquired, TriggerKind::CorruptionThreshold])
    .with_weight(0.8)
}

fn discovery_sunken_archive() -> QuestTemplate {
    QuestTemplate::new(
        "discovery-sunken-archive",
        NarrativeTheme::Discovery,
        "The Sunken Archive",
        "Flood waters receded from the old quarter and exposed an archive no \
         living scholar has catalogued. A {epithet} could be first inside, \
         {approach}.",
    )
    .with_objective(ObjectiveTemplate::new("Find a way into the archive", 1))
    .with_objective(ObjectiveTemplate::new("Recover legible volumes", 3))
    .with_objective(ObjectiveTemplate::new("Map the lower stacks", 1).optional())
    .with_choice(
        ChoiceTemplate::new("Donate the volumes to the town library")
            .with_effect(ConsequenceEffect::FactionShift {
                faction: "Athenaeum".into(),
                delta: 5.0,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Discovery, 0.6)),
    )
    .with_choice(
        ChoiceTemplate::new("Keep the rarest volume for yourself")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: -0.1,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Discovery, 0.4))
            .with_tag(ConsequenceTag::new(NarrativeTheme::ForbiddenKnowledge, 0.3)),
    )
    .with_reward(RewardTemplate::new(100, 60))
    .with_triggers([TriggerKind::LocationEntered, TriggerKind::TimeElapsed])
}

fn betrayal_hollow_oath() -> QuestTemplate {
    QuestTemplate::new(
        "betrayal-hollow-oath",
        NarrativeTheme::Betrayal,
        "The Hollow Oath",
        "An ally who swore beside you has been seen treating with your \
         enemies. Only a {epithet} can learn the truth of it {approach}.",
    )
    .with_objective(ObjectiveTemplate::new("Confirm the ally's dealings", 1))
    .with_objective(ObjectiveTemplate::new("Confront or expose the traitor", 1))
    .with_choice(
        ChoiceTemplate::new("Expose the traitor publicly")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::OrderChaos,
                delta: 0.15,
            })
            .with_effect(ConsequenceEffect::FlagWrite {
                key: "exposed_a_traitor".into(),
                value: FlagValue::Bool(true),
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Betrayal, 0.5)),
    )
    .with_choice(
        ChoiceTemplate::new("Blackmail them into serving you")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: -0.2,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Betrayal, 0.7))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Power, 0.5)),
    )
    .with_reward(RewardTemplate::new(140, 30))
    .with_triggers([TriggerKind::DialogueChoice, TriggerKind::FactionChange])
}

fn betrayal_double_agent() -> QuestTemplate {
    QuestTemplate::new(
        "betrayal-double-agent",
        NarrativeTheme::Betrayal,
        "A Knife Passed in Shadow",
        "A faction you bled for wants you to betray another that trusts you. \
         Whatever a {epithet} chooses, someone's trust dies.",
    )
    .with_objective(ObjectiveTemplate::new("Meet the faction handler", 1))
    .with_objective(ObjectiveTemplate::new("Deliver or destroy the sealed orders", 1))
    .with_choice(
        ChoiceTemplate::new("Carry out the betrayal")
            .with_effect(ConsequenceEffect::FactionShift {
                faction: "Ashen Circle".into(),
                delta: 6.0,
            })
            .with_effect(ConsequenceEffect::FactionShift {
                faction: "Wardens".into(),
                delta: -8.0,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Betrayal, 0.8)),
    )
    .with_choice(
        ChoiceTemplate::new("Burn the orders and confess to both sides")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: 0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Redemption, 0.5))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Betrayal, -0.4)),
    )
    .with_reward(RewardTemplate::new(160, 80))
    .with_prerequisite(Prerequisite::MinLevel(4))
    .with_triggers([TriggerKind::FactionChange, TriggerKind::DialogueChoice])
    .with_weight(0.9)
}

fn redemption_debt_of_ash() -> QuestTemplate {
    QuestTemplate::new(
        "redemption-debt-of-ash",
        NarrativeTheme::Redemption,
        "A Debt of Ash",
        "Someone you wronged has surfaced, poor and unforgiving. A {epithet} \
         could make it right {approach}, if making it right still matters.",
    )
    .with_objective(ObjectiveTemplate::new("Find the one you wronged", 1))
    .with_objective(ObjectiveTemplate::new("Make restitution", 1))
    .with_choice(
        ChoiceTemplate::new("Give them everything the wrong cost them")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: 0.2,
            })
            .with_effect(ConsequenceEffect::FlagWrite {
                key: "debt_repaid".into(),
                value: FlagValue::Bool(true),
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Redemption, 0.8)),
    )
    .with_choice(
        ChoiceTemplate::new("Buy their silence instead")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: -0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Redemption, -0.5)),
    )
    .with_reward(RewardTemplate::new(110, 0))
    .with_triggers([TriggerKind::DialogueChoice, TriggerKind::LocationEntered])
}

fn vengeance_blood_price() -> QuestTemplate {
    QuestTemplate::new(
        "vengeance-blood-price",
        NarrativeTheme::Vengeance,
        "The Blood Price",
        "The one who broke your company walks free under a bought pardon. \
         A {epithet} knows what pardons are worth, {approach}.",
    )
    .with_objective(ObjectiveTemplate::new("Track the pardoned killer", 1))
    .with_objective(ObjectiveTemplate::new("Exact the price", 1))
    .with_choice(
        ChoiceTemplate::new("Kill them and leave the pardon on the body")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: -0.2,
            })
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::OrderChaos,
                delta: -0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Vengeance, 0.8)),
    )
    .with_choice(
        ChoiceTemplate::new("Drag them to an honest court")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::OrderChaos,
                delta: 0.2,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Vengeance, 0.3))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Redemption, 0.3)),
    )
    .with_reward(RewardTemplate::new(150, 50))
    .with_prerequisite(Prerequisite::MinLevel(3))
    .with_triggers([TriggerKind::CombatVictory, TriggerKind::DialogueChoice])
}

fn protection_last_caravan() -> QuestTemplate {
    QuestTemplate::new(
        "protection-last-caravan",
        NarrativeTheme::Protection,
        "The Last Caravan",
        "The season's last caravan must cross raider country, and its \
         master will pay a {epithet} to see it through {approach}.",
    )
    .with_objective(ObjectiveTemplate::new("Escort the caravan through the pass", 1))
    .with_objective(ObjectiveTemplate::new("Drive off raider attacks", 2))
    .with_choice(
        ChoiceTemplate::new("Refuse payment from the struggling master")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: 0.2,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Protection, 0.7)),
    )
    .with_choice(
        ChoiceTemplate::new("Demand double for the danger")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: -0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Protection, 0.2))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Power, 0.3)),
    )
    .with_reward(RewardTemplate::new(130, 70))
    .with_triggers([TriggerKind::LocationEntered, TriggerKind::CombatVictory])
}

fn forbidden_sealed_pages() -> QuestTemplate {
    QuestTemplate::new(
        "forbidden-sealed-pages",
        NarrativeTheme::ForbiddenKnowledge,
        "The Sealed Pages",
        "A book bound in lead has come into your hands. Every seal a \
         {epithet} breaks will teach something, and take something.",
    )
    .with_objective(ObjectiveTemplate::new("Break the first seal", 1))
    .with_objective(ObjectiveTemplate::new("Endure what the pages show", 1))
    .with_choice(
        ChoiceTemplate::new("Read to the end, whatever it costs")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::OrderChaos,
                delta: -0.1,
            })
            .with_effect(ConsequenceEffect::FlagWrite {
                key: "read_the_sealed_pages".into(),
                value: FlagValue::Bool(true),
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::ForbiddenKnowledge, 0.8))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Corruption, 0.3)),
    )
    .with_choice(
        ChoiceTemplate::new("Sink the book in the harbor")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::OrderChaos,
                delta: 0.1,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::ForbiddenKnowledge, -0.5)),
    )
    .with_reward(RewardTemplate::new(170, 0).with_item("Lead Binding"))
    .with_prerequisite(Prerequisite::MinLevel(5))
    .with_triggers([TriggerKind::ItemAcquired, TriggerKind::LevelUp])
}

fn survival_long_winter() -> QuestTemplate {
    QuestTemplate::new(
        "survival-long-winter",
        NarrativeTheme::Survival,
        "The Long Winter",
        "The passes closed early and the larders are thin. The town needs a \
         {epithet} to bring in food before the deep cold, {approach}.",
    )
    .with_objective(ObjectiveTemplate::new("Hunt or forage provisions", 3))
    .with_objective(ObjectiveTemplate::new("Return before the deep cold", 1))
    .with_choice(
        ChoiceTemplate::new("Share the provisions evenly")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: 0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Survival, 0.5))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Protection, 0.4)),
    )
    .with_choice(
        ChoiceTemplate::new("Hold back a private store")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: -0.2,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Survival, 0.6)),
    )
    .with_reward(RewardTemplate::new(90, 20))
    .with_triggers([TriggerKind::TimeElapsed, TriggerKind::LocationEntered])
}

fn power_empty_throne() -> QuestTemplate {
    QuestTemplate::new(
        "power-empty-throne",
        NarrativeTheme::Power,
        "The Empty Chair",
        "The guildmaster is dead and the chair stands empty. Several hands \
         reach for it; a {epithet} could reach faster, {approach}.",
    )
    .with_objective(ObjectiveTemplate::new("Win over three guild captains", 3))
    .with_objective(ObjectiveTemplate::new("Claim or cede the chair", 1))
    .with_choice(
        ChoiceTemplate::new("Take the chair yourself")
            .with_effect(ConsequenceEffect::FactionShift {
                faction: "Free Guild".into(),
                delta: 10.0,
            })
            .with_effect(ConsequenceEffect::FlagWrite {
                key: "guild_chair".into(),
                value: FlagValue::Bool(true),
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Power, 0.8)),
    )
    .with_choice(
        ChoiceTemplate::new("Install a rival who owes you")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: -0.1,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Power, 0.6))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Betrayal, 0.3)),
    )
    .with_reward(RewardTemplate::new(180, 100))
    .with_prerequisite(Prerequisite::MinLevel(6))
    .with_triggers([TriggerKind::FactionChange, TriggerKind::LevelUp])
}

fn sacrifice_the_lantern() -> QuestTemplate {
    QuestTemplate::new(
        "sacrifice-the-lantern",
        NarrativeTheme::Sacrifice,
        "The Lantern and the Flood",
        "The sea-wall lantern must burn through the storm or the fleet \
         founders, and lighting it strands whoever carries the flame. \
         A {epithet} understands the arithmetic.",
    )
    .with_objective(ObjectiveTemplate::new("Carry the flame to the sea-wall", 1))
    .with_objective(ObjectiveTemplate::new("Keep the lantern lit through the storm", 1))
    .with_choice(
        ChoiceTemplate::new("Stay with the lantern yourself")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::SelflessSelfish,
                delta: 0.25,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Sacrifice, 0.8)),
    )
    .with_choice(
        ChoiceTemplate::new("Pay a desperate volunteer to stay")
            .with_effect(ConsequenceEffect::AlignmentShift {
                axis: AlignmentAxis::GoodEvil,
                delta: -0.15,
            })
            .with_tag(ConsequenceTag::new(NarrativeTheme::Sacrifice, -0.4))
            .with_tag(ConsequenceTag::new(NarrativeTheme::Power, 0.2)),
    )
    .with_reward(RewardTemplate::new(160, 0))
    .with_triggers([TriggerKind::LocationEntered, TriggerKind::TimeElapsed])
}
