//! Fixed option sets offered by the form. Labels are the exact strings the
//! backend was trained against, so they go over the wire verbatim.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

macro_rules! vocab_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| anyhow!(
                        "unknown {}: {wanted:?} (expected one of: {})",
                        stringify!($name),
                        Self::ALL
                            .iter()
                            .map(|v| v.label())
                            .collect::<Vec<_>>()
                            .join(", "),
                    ))
            }
        }
    };
}

vocab_enum! {
    /// Industry the company operates in.
    Industry {
        TechnologySoftware => "Technology/Software",
        Healthcare => "Healthcare",
        FinancialServices => "Financial Services",
        Manufacturing => "Manufacturing",
        RetailEcommerce => "Retail/E-commerce",
        RealEstate => "Real Estate",
        Education => "Education",
        Consulting => "Consulting",
        MarketingAdvertising => "Marketing/Advertising",
        Other => "Other",
    }
}

vocab_enum! {
    /// Buyer role the deck should speak to. Multi-select in the form.
    Persona {
        CeoFounder => "CEO/Founder",
        Cmo => "CMO",
        Cto => "CTO",
        HeadOfSales => "Head of Sales",
        HeadOfProcurement => "Head of Procurement",
        VpOfOperations => "VP of Operations",
        Cfo => "CFO",
        ProductManager => "Product Manager",
        Other => "Other",
    }
}

vocab_enum! {
    /// What the deck will be used for.
    UseCase {
        OutboundSalesPitch => "Outbound Sales Pitch",
        FundraisingPresentation => "Fundraising Presentation",
        PartnershipProposal => "Partnership Proposal",
        ProductDemo => "Product Demo",
        CompanyOverview => "Company Overview",
        InvestorUpdate => "Investor Update",
        BoardPresentation => "Board Presentation",
    }
}

vocab_enum! {
    /// Output format. Only PowerPoint is produced by the backend today.
    ExportFormat {
        Powerpoint => "powerpoint",
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Powerpoint
    }
}

/// Join personas the way the request body expects them.
pub fn join_personas(personas: &[Persona]) -> String {
    personas
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn labels_round_trip_through_from_str() -> Result<()> {
        for industry in Industry::ALL {
            assert_eq!(*industry, industry.label().parse::<Industry>()?);
        }
        for persona in Persona::ALL {
            assert_eq!(*persona, persona.label().parse::<Persona>()?);
        }
        for use_case in UseCase::ALL {
            assert_eq!(*use_case, use_case.label().parse::<UseCase>()?);
        }
        Ok(())
    }

    #[test]
    fn from_str_is_case_insensitive() -> Result<()> {
        assert_eq!("healthcare".parse::<Industry>()?, Industry::Healthcare);
        assert_eq!("ceo/founder".parse::<Persona>()?, Persona::CeoFounder);
        assert_eq!("product demo".parse::<UseCase>()?, UseCase::ProductDemo);
        Ok(())
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!("Astrology".parse::<Industry>().is_err());
        assert!("Intern".parse::<Persona>().is_err());
    }

    #[test]
    fn personas_join_with_comma_space() {
        let joined = join_personas(&[Persona::CeoFounder, Persona::Cfo]);
        assert_eq!(joined, "CEO/Founder, CFO");
        assert_eq!(join_personas(&[]), "");
    }
}
