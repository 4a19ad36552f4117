//! Operation container - a pawn's queue of surgeries
//!
//! Loading clears the whole queue as soon as the header is accepted and
//! then re-adds the bills it can resolve. Records that fail are lost along
//! with the bills they replaced.

use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::core::constants::{
    FILTER_RANGE_DELIMITER, INSTALLATION_PREFIX, KEY_PART, KEY_RECIPE, KEY_SUSPENDED,
    REMOVAL_PREFIX,
};
use crate::core::envelope::{SaveableContainer, Version};
use crate::core::format::{format_bool, parse_bool, require, FieldWriter, InvalidValue};
use crate::core::reader::{closed_records, read_records, Record};
use crate::core::traits::{MessageSink, OperationQueue};
use crate::core::types::{BodyPart, MedicalBill};

use super::{GameContext, CONTAINER_VERSION};

/// Why an operation record was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRecordError {
    MissingRecipe,
    UnknownRecipe(String),
    /// Removal of a part the pawn no longer has
    MissingPart { pawn: String, part: String },
    /// Installation target not in the pawn's body at all
    UnknownPart(String),
    InvalidValue(InvalidValue),
}

impl fmt::Display for OperationRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationRecordError::MissingRecipe => write!(f, "Operation record has no recipe"),
            OperationRecordError::UnknownRecipe(name) => {
                write!(f, "Unable to load bill with recipe [{}]", name)
            }
            OperationRecordError::MissingPart { pawn, part } => write!(
                f,
                "Pawn [{}] does not have body part [{}] to have removed",
                pawn, part
            ),
            OperationRecordError::UnknownPart(part) => write!(f, "Unknown body part [{}]", part),
            OperationRecordError::InvalidValue(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OperationRecordError {}

impl From<InvalidValue> for OperationRecordError {
    fn from(e: InvalidValue) -> Self {
        OperationRecordError::InvalidValue(e)
    }
}

/// Saves and loads the medical bills of one pawn
pub struct OperationContainer<'a, Q: OperationQueue> {
    pawn: &'a mut Q,
    ctx: GameContext<'a>,
}

impl<'a, Q: OperationQueue> OperationContainer<'a, Q> {
    pub fn new(pawn: &'a mut Q, ctx: GameContext<'a>) -> Self {
        Self { pawn, ctx }
    }

    fn create_bill(&self, record: &Record) -> Result<MedicalBill, OperationRecordError> {
        let name = record
            .get(KEY_RECIPE)
            .ok_or(OperationRecordError::MissingRecipe)?
            .unwrap_or_default();
        let recipe = self
            .ctx
            .defs
            .recipe(name)
            .ok_or_else(|| OperationRecordError::UnknownRecipe(name.to_string()))?;

        let mut bill = MedicalBill::new(recipe);
        if let Some(value) = record.get(KEY_SUSPENDED) {
            bill.suspended = require(KEY_SUSPENDED, value, parse_bool)?;
        }
        if let Some(value) = record.get(KEY_PART) {
            bill.part = self.resolve_part(&bill.recipe.def_name, value.unwrap_or_default())?;
        }
        Ok(bill)
    }

    /// Find the body part a `label:defName` value refers to
    ///
    /// Removals need a part the pawn still has, matched by label.
    /// Installations may target a missing part, matched by definition and
    /// preferably by label too. Other recipes keep no part.
    fn resolve_part(
        &self,
        recipe: &str,
        value: &str,
    ) -> Result<Option<BodyPart>, OperationRecordError> {
        let (label, def_name) = value
            .split_once(FILTER_RANGE_DELIMITER)
            .unwrap_or((value, ""));

        if recipe.starts_with(REMOVAL_PREFIX) {
            let part = self
                .pawn
                .present_parts()
                .into_iter()
                .find(|p| p.label == label)
                .ok_or_else(|| OperationRecordError::MissingPart {
                    pawn: self.pawn.pawn_name(),
                    part: label.to_string(),
                })?;
            return Ok(Some(part));
        }

        if recipe.starts_with(INSTALLATION_PREFIX) {
            let body = self.pawn.all_body_parts();
            let part = body
                .iter()
                .find(|p| p.def_name == def_name && p.label == label)
                .or_else(|| body.iter().find(|p| p.def_name == def_name))
                .cloned()
                .ok_or_else(|| OperationRecordError::UnknownPart(def_name.to_string()))?;
            return Ok(Some(part));
        }

        Ok(None)
    }
}

impl<Q: OperationQueue> SaveableContainer for OperationContainer<'_, Q> {
    const NAME: &'static str = "operations";

    fn version(&self) -> Version {
        CONTAINER_VERSION
    }

    fn messages(&self) -> &dyn MessageSink {
        self.ctx.messages
    }

    fn save_fields<W: Write>(&self, writer: &mut FieldWriter<W>) -> io::Result<()> {
        for bill in self.pawn.medical_bills() {
            writer.write_field(KEY_RECIPE, &bill.recipe.def_name)?;
            writer.write_field(KEY_SUSPENDED, format_bool(bill.suspended))?;
            if bill.recipe.targets_body_part {
                let part = bill
                    .part
                    .as_ref()
                    .map(|p| format!("{}{}{}", p.label, FILTER_RANGE_DELIMITER, p.def_name))
                    .unwrap_or_default();
                writer.write_field(KEY_PART, part)?;
            }
            writer.write_separator()?;
        }
        Ok(())
    }

    fn load_fields<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        let records = read_records(reader)?;

        let dropped = self.pawn.medical_bills().len();
        self.pawn.clear_bills();
        debug!(pawn = %self.pawn.pawn_name(), dropped, "[operations] Cleared queue");

        for record in closed_records(&records) {
            match self.create_bill(record) {
                Ok(bill) => self.pawn.add_bill(bill),
                Err(e) => self.ctx.skip_record(Self::NAME, &e, false),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::envelope::ContainerError;
    use crate::core::traits::mocks::{MockDefs, MockMessages, MockPawn, MockZones};
    use crate::core::types::RecipeDef;
    use std::io::Cursor;

    struct Fixture {
        defs: MockDefs,
        zones: MockZones,
        messages: MockMessages,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                defs: MockDefs::new()
                    .with_recipe(RecipeDef::new("Anesthetize", "anesthetize"))
                    .with_recipe(
                        RecipeDef::new("RemoveBodyPart", "remove part").targeting_body_part(),
                    )
                    .with_recipe(
                        RecipeDef::new("InstallBionicArm", "install bionic arm")
                            .targeting_body_part(),
                    )
                    .with_recipe(
                        RecipeDef::new("InstallPegLeg", "install peg leg").targeting_body_part(),
                    ),
                zones: MockZones::default(),
                messages: MockMessages::new(),
            }
        }

        fn ctx(&self) -> GameContext<'_> {
            GameContext::new(&self.defs, &self.zones, &self.messages)
        }

        fn recipe(&self, name: &str) -> RecipeDef {
            self.defs.recipes[name].clone()
        }

        fn save(&self, pawn: &mut MockPawn) -> String {
            let container = OperationContainer::new(pawn, self.ctx());
            let mut out = Vec::new();
            container.write_to(&mut out).unwrap();
            String::from_utf8(out).unwrap()
        }

        fn load(&self, pawn: &mut MockPawn, text: &str) -> Result<(), ContainerError> {
            let mut container = OperationContainer::new(pawn, self.ctx());
            container.read_from(Cursor::new(text.as_bytes()))
        }
    }

    #[test]
    fn test_save_operations() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");

        let mut anesthetize = MedicalBill::new(fx.recipe("Anesthetize"));
        anesthetize.suspended = true;
        pawn.bills.push(anesthetize);

        let mut removal = MedicalBill::new(fx.recipe("RemoveBodyPart"));
        removal.part = Some(BodyPart::new("heart", "Heart"));
        pawn.bills.push(removal);

        assert_eq!(
            fx.save(&mut pawn),
            "Version:1.0\n\
             recipeDefName:Anesthetize\n\
             suspended:True\n\
             ---{{BREAK}}---\n\
             recipeDefName:RemoveBodyPart\n\
             suspended:False\n\
             part:heart:Heart\n\
             ---{{BREAK}}---\n"
        );
    }

    #[test]
    fn test_load_replaces_queue() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");
        pawn.bills.push(MedicalBill::new(fx.recipe("Anesthetize")));

        let text = "Version:1.0\n\
                    recipeDefName:RemoveBodyPart\nsuspended:False\npart:right hand:Hand\n---{{BREAK}}---\n\
                    recipeDefName:InstallBionicArm\nsuspended:True\npart:left hand:Hand\n---{{BREAK}}---\n";
        fx.load(&mut pawn, text).unwrap();

        assert_eq!(pawn.bills.len(), 2);
        assert_eq!(pawn.bills[0].recipe.def_name, "RemoveBodyPart");
        assert_eq!(pawn.bills[0].part, Some(BodyPart::new("right hand", "Hand")));
        assert!(pawn.bills[1].suspended);
        assert_eq!(pawn.bills[1].part, Some(BodyPart::new("left hand", "Hand")));
    }

    #[test]
    fn test_removal_of_missing_part_is_dropped() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");
        fx.load(
            &mut pawn,
            "Version:1.0\nrecipeDefName:RemoveBodyPart\npart:left hand:Hand\n---{{BREAK}}---\n",
        )
        .unwrap();
        assert!(pawn.bills.is_empty());
    }

    #[test]
    fn test_installation_prefers_matching_label() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");
        fx.load(
            &mut pawn,
            "Version:1.0\n\
             recipeDefName:InstallPegLeg\npart:right leg:Leg\n---{{BREAK}}---\n\
             recipeDefName:InstallPegLeg\npart:third leg:Leg\n---{{BREAK}}---\n\
             recipeDefName:InstallPegLeg\npart:tail:Tail\n---{{BREAK}}---\n",
        )
        .unwrap();

        let parts: Vec<_> = pawn.bills.iter().map(|b| b.part.clone()).collect();
        assert_eq!(
            parts,
            vec![
                Some(BodyPart::new("right leg", "Leg")),
                Some(BodyPart::new("left leg", "Leg")),
            ]
        );
    }

    #[test]
    fn test_failed_records_still_clear_queue() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");
        pawn.bills.push(MedicalBill::new(fx.recipe("Anesthetize")));

        fx.load(
            &mut pawn,
            "Version:1.0\nrecipeDefName:RemoveAppendix\n---{{BREAK}}---\n",
        )
        .unwrap();
        assert!(pawn.bills.is_empty());
    }

    #[test]
    fn test_bad_header_keeps_queue() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");
        pawn.bills.push(MedicalBill::new(fx.recipe("Anesthetize")));

        let result = fx.load(&mut pawn, "recipeDefName:Anesthetize\n---{{BREAK}}---\n");
        assert!(result.is_err());
        assert_eq!(pawn.bills.len(), 1);
    }

    #[test]
    fn test_part_ignored_for_other_recipes() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");
        fx.load(
            &mut pawn,
            "Version:1.0\nrecipeDefName:Anesthetize\npart:heart:Heart\n---{{BREAK}}---\n",
        )
        .unwrap();
        assert_eq!(pawn.bills.len(), 1);
        assert_eq!(pawn.bills[0].part, None);
    }

    #[test]
    fn test_invalid_suspended_drops_record() {
        let fx = Fixture::new();
        let mut pawn = MockPawn::new("Tynan");
        fx.load(
            &mut pawn,
            "Version:1.0\nrecipeDefName:Anesthetize\nsuspended:perhaps\n---{{BREAK}}---\n",
        )
        .unwrap();
        assert!(pawn.bills.is_empty());
    }
}
