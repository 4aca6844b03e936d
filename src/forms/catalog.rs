use super::{is_keep, Progress};
use crate::models::{Category, CategoryInput, Medicine, MedicineInput, ReviewInput};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum MedicineStep {
    #[default]
    Name,
    Description,
    Price,
    Stock,
    Manufacturer,
    Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicineSubmission {
    /// Set when an existing medicine is being edited.
    pub id: Option<String>,
    pub input: MedicineInput,
}

/// Create or edit a listed medicine. While editing, `-` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicineDraft {
    step: MedicineStep,
    editing: Option<Medicine>,
    categories: Vec<Category>,
    name: String,
    description: String,
    price: f64,
    stock: u32,
    manufacturer: String,
}

impl MedicineDraft {
    pub fn create(categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    pub fn edit(medicine: Medicine, categories: Vec<Category>) -> Self {
        Self {
            editing: Some(medicine),
            categories,
            ..Self::default()
        }
    }

    pub fn prompt(&self) -> String {
        let current = self.editing.as_ref();
        match self.step {
            MedicineStep::Name => with_current("Medicine name", current.map(|m| m.name.clone())),
            MedicineStep::Description => with_current(
                "Short description",
                current.and_then(|m| m.description.clone()),
            ),
            MedicineStep::Price => with_current("Price", current.map(|m| format!("{:.2}", m.price))),
            MedicineStep::Stock => {
                with_current("Units in stock", current.map(|m| m.stock.to_string()))
            }
            MedicineStep::Manufacturer => with_current(
                "Manufacturer",
                current.and_then(|m| m.manufacturer.clone()),
            ),
            MedicineStep::Category => {
                let options = self
                    .categories
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("{}. {}", i + 1, c.name))
                    .collect::<Vec<_>>()
                    .join("\n");
                let current = current.and_then(|m| m.category_name().map(str::to_string));
                format!(
                    "{}\n{}",
                    with_current("Category (number or name)", current),
                    options
                )
            }
        }
    }

    pub fn accept(&self, input: &str) -> Result<Progress<Self, MedicineSubmission>, ValidationError> {
        let mut draft = self.clone();
        let keep = is_keep(input) && self.editing.is_some();
        let current = self.editing.as_ref();

        match self.step {
            MedicineStep::Name => {
                draft.name = match current {
                    Some(m) if keep => m.name.clone(),
                    _ => validation::required("Name", input)?,
                };
                draft.step = MedicineStep::Description;
            }
            MedicineStep::Description => {
                draft.description = match current {
                    Some(m) if keep => m.description.clone().unwrap_or_default(),
                    _ => validation::required("Description", input)?,
                };
                draft.step = MedicineStep::Price;
            }
            MedicineStep::Price => {
                draft.price = match current {
                    Some(m) if keep => m.price,
                    _ => validation::price(input)?,
                };
                draft.step = MedicineStep::Stock;
            }
            MedicineStep::Stock => {
                draft.stock = match current {
                    Some(m) if keep => m.stock,
                    _ => validation::stock(input)?,
                };
                draft.step = MedicineStep::Manufacturer;
            }
            MedicineStep::Manufacturer => {
                draft.manufacturer = match current {
                    Some(m) if keep => m.manufacturer.clone().unwrap_or_default(),
                    _ => validation::required("Manufacturer", input)?,
                };
                draft.step = MedicineStep::Category;
            }
            MedicineStep::Category => {
                let category_id = match current.and_then(|m| m.category_id.clone()) {
                    Some(id) if keep => id,
                    _ => self.choose_category(input)?.id.clone(),
                };
                return Ok(Progress::Done(MedicineSubmission {
                    id: current.map(|m| m.id.clone()),
                    input: MedicineInput {
                        name: draft.name,
                        description: draft.description,
                        price: draft.price,
                        stock: draft.stock,
                        manufacturer: draft.manufacturer,
                        category_id,
                        image: current.and_then(|m| m.image.clone()),
                    },
                }));
            }
        }

        let prompt = draft.prompt();
        Ok(Progress::next(draft, prompt))
    }

    fn choose_category(&self, input: &str) -> Result<&Category, ValidationError> {
        let input = input.trim();
        let by_number = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.categories.get(i));
        by_number
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(input))
            })
            .ok_or(ValidationError::Choice("Please pick one of the listed categories."))
    }
}

fn with_current(label: &str, current: Option<String>) -> String {
    match current {
        Some(value) => format!("{} (current: {}, send - to keep):", label, value),
        None => format!("{}:", label),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    medicine_id: String,
    rating: Option<u8>,
}

impl ReviewDraft {
    pub const PROMPT: &'static str = "How would you rate it, from 1 to 5?";

    pub fn new(medicine_id: impl Into<String>) -> Self {
        Self {
            medicine_id: medicine_id.into(),
            rating: None,
        }
    }

    pub fn accept(&self, input: &str) -> Result<Progress<Self, ReviewInput>, ValidationError> {
        match self.rating {
            None => {
                let rating = validation::rating(input)?;
                Ok(Progress::next(
                    ReviewDraft {
                        medicine_id: self.medicine_id.clone(),
                        rating: Some(rating),
                    },
                    "Add a comment (or - to leave none):",
                ))
            }
            Some(rating) => Ok(Progress::Done(ReviewInput {
                medicine_id: self.medicine_id.clone(),
                rating,
                comment: if is_keep(input) {
                    String::new()
                } else {
                    input.trim().to_string()
                },
            })),
        }
    }
}

/// Parses `Name` or `Name | description`.
pub fn parse_category(input: &str) -> Result<CategoryInput, ValidationError> {
    let (name, description) = match input.split_once('|') {
        Some((name, description)) => (name, Some(description.trim())),
        None => (input, None),
    };
    Ok(CategoryInput {
        name: validation::required("Category name", name)?,
        description: description
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}
