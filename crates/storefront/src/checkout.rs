//! Checkout wizard state machine.
//!
//! A four-step accordion: delivery, contact, payment, summary. Progress
//! moves forward one step per "Continuar" submit; step headers can be
//! toggled open or closed at any time without affecting progress, so a
//! shopper can reopen an earlier step to review or edit it. Confirm is
//! only available while the summary step is the active one.
//!
//! Each step's fields arrive as a typed form draft; the merged wizard
//! lives in the session and is discarded after submission or whenever
//! the shopper abandons checkout.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    Delivery,
    Contact,
    Payment,
    Summary,
}

impl Step {
    /// 1-based position of this step.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Delivery => 1,
            Self::Contact => 2,
            Self::Payment => 3,
            Self::Summary => 4,
        }
    }

    /// Step for a 1-based position.
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Delivery),
            2 => Some(Self::Contact),
            3 => Some(Self::Payment),
            4 => Some(Self::Summary),
            _ => None,
        }
    }

    /// The step after this one; `None` from the summary.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Delivery => Some(Self::Contact),
            Self::Contact => Some(Self::Payment),
            Self::Payment => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    /// Header label shown on the accordion.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Delivery => "Entrega",
            Self::Contact => "Contacto",
            Self::Payment => "Pago",
            Self::Summary => "Resumen",
        }
    }
}

/// Delivery method selected in step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// Courier delivery to the shopper's address.
    #[default]
    Delivery,
    /// Pickup at the pharmacy counter.
    Pickup,
}

impl DeliveryMethod {
    /// Parse the form value. Unknown values fall back to delivery.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        match param {
            "recojo" => Self::Pickup,
            _ => Self::Delivery,
        }
    }

    /// Wire value sent to the backend.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Delivery => "DELIVERY",
            Self::Pickup => "RECOJO_EN_TIENDA",
        }
    }
}

/// Payment method selected in step 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    Transfer,
}

impl PaymentMethod {
    /// Parse the form value. Unknown values fall back to card.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        match param {
            "efectivo" => Self::Cash,
            "transferencia" => Self::Transfer,
            _ => Self::Card,
        }
    }

    /// Wire value sent to the backend.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Card => "TARJETA",
            Self::Cash => "EFECTIVO",
            Self::Transfer => "TRANSFERENCIA",
        }
    }
}

/// Step 1 draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDraft {
    pub method: DeliveryMethod,
    pub address: String,
    pub city: String,
    pub reference: String,
}

/// Step 2 draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

/// Step 3 draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub method: PaymentMethod,
}

/// The accordion wizard held in the session during checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutWizard {
    /// The step whose "Continuar" is live; confirm requires `Summary`.
    pub active_step: Step,
    /// Step numbers whose panels were explicitly toggled by the shopper.
    /// A toggled entry inverts that step's default visibility.
    toggled: BTreeSet<u8>,
    pub delivery: DeliveryDraft,
    pub contact: ContactDraft,
    pub payment: PaymentDraft,
}

impl Default for CheckoutWizard {
    fn default() -> Self {
        Self {
            active_step: Step::Delivery,
            toggled: BTreeSet::new(),
            delivery: DeliveryDraft::default(),
            contact: ContactDraft::default(),
            payment: PaymentDraft::default(),
        }
    }
}

impl CheckoutWizard {
    /// Merge a step draft and advance to the next step.
    ///
    /// Toggles reset on advance so the newly active panel is the open one.
    pub fn submit_delivery(&mut self, draft: DeliveryDraft) {
        self.delivery = draft;
        self.advance_from(Step::Delivery);
    }

    /// Merge the contact draft and advance.
    pub fn submit_contact(&mut self, draft: ContactDraft) {
        self.contact = draft;
        self.advance_from(Step::Contact);
    }

    /// Merge the payment draft and advance.
    pub fn submit_payment(&mut self, draft: PaymentDraft) {
        self.payment = draft;
        self.advance_from(Step::Payment);
    }

    fn advance_from(&mut self, step: Step) {
        // Resubmitting an earlier step never moves progress backwards
        if step == self.active_step
            && let Some(next) = step.next()
        {
            self.active_step = next;
        }
        self.toggled.clear();
    }

    /// Toggle a step's panel open or closed, independent of progress.
    pub fn toggle(&mut self, step: Step) {
        let n = step.number();
        if !self.toggled.remove(&n) {
            self.toggled.insert(n);
        }
    }

    /// Whether a step's panel is currently open.
    ///
    /// The active step is open unless toggled closed; other steps are
    /// closed unless toggled open.
    #[must_use]
    pub fn is_open(&self, step: Step) -> bool {
        let toggled = self.toggled.contains(&step.number());
        (step == self.active_step) != toggled
    }

    /// Whether the confirm action is enabled.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.active_step == Step::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_delivery() {
        let wizard = CheckoutWizard::default();
        assert_eq!(wizard.active_step, Step::Delivery);
        assert!(wizard.is_open(Step::Delivery));
        assert!(!wizard.is_open(Step::Summary));
        assert!(!wizard.can_confirm());
    }

    #[test]
    fn test_forward_progression() {
        let mut wizard = CheckoutWizard::default();
        wizard.submit_delivery(DeliveryDraft::default());
        assert_eq!(wizard.active_step, Step::Contact);
        wizard.submit_contact(ContactDraft::default());
        assert_eq!(wizard.active_step, Step::Payment);
        wizard.submit_payment(PaymentDraft::default());
        assert_eq!(wizard.active_step, Step::Summary);
        assert!(wizard.can_confirm());
    }

    #[test]
    fn test_confirm_disabled_before_summary() {
        let mut wizard = CheckoutWizard::default();
        wizard.submit_delivery(DeliveryDraft::default());
        wizard.submit_contact(ContactDraft::default());
        assert_eq!(wizard.active_step, Step::Payment);
        assert!(!wizard.can_confirm());
    }

    #[test]
    fn test_resubmitting_earlier_step_keeps_progress() {
        let mut wizard = CheckoutWizard::default();
        wizard.submit_delivery(DeliveryDraft::default());
        wizard.submit_contact(ContactDraft::default());
        wizard.submit_payment(PaymentDraft::default());

        // Shopper reopens step 1 and edits the address
        let edited = DeliveryDraft {
            address: "Jr. Union 456".to_string(),
            ..DeliveryDraft::default()
        };
        wizard.submit_delivery(edited.clone());

        assert_eq!(wizard.delivery, edited);
        // Still on summary; confirm stays enabled
        assert!(wizard.can_confirm());
    }

    #[test]
    fn test_toggle_opens_inactive_step() {
        let mut wizard = CheckoutWizard::default();
        wizard.submit_delivery(DeliveryDraft::default());

        assert!(!wizard.is_open(Step::Delivery));
        wizard.toggle(Step::Delivery);
        assert!(wizard.is_open(Step::Delivery));
        // Progress untouched
        assert_eq!(wizard.active_step, Step::Contact);

        wizard.toggle(Step::Delivery);
        assert!(!wizard.is_open(Step::Delivery));
    }

    #[test]
    fn test_toggle_closes_active_step() {
        let mut wizard = CheckoutWizard::default();
        wizard.toggle(Step::Delivery);
        assert!(!wizard.is_open(Step::Delivery));
    }

    #[test]
    fn test_advance_resets_toggles() {
        let mut wizard = CheckoutWizard::default();
        wizard.toggle(Step::Payment);
        assert!(wizard.is_open(Step::Payment));
        wizard.submit_delivery(DeliveryDraft::default());
        // After advancing, only the new active panel is open
        assert!(wizard.is_open(Step::Contact));
        assert!(!wizard.is_open(Step::Payment));
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(Step::Delivery.number(), 1);
        assert_eq!(Step::Summary.number(), 4);
        assert_eq!(Step::from_number(2), Some(Step::Contact));
        assert_eq!(Step::from_number(5), None);
        assert_eq!(Step::Summary.next(), None);
    }

    #[test]
    fn test_method_params() {
        assert_eq!(DeliveryMethod::from_param("recojo"), DeliveryMethod::Pickup);
        assert_eq!(
            DeliveryMethod::from_param("anything"),
            DeliveryMethod::Delivery
        );
        assert_eq!(PaymentMethod::from_param("efectivo"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::Card.as_wire(), "TARJETA");
        assert_eq!(DeliveryMethod::Pickup.as_wire(), "RECOJO_EN_TIENDA");
    }
}
