use std::fmt;

/// How notable a single die result is, relative to the die size.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// Bottom 1% of the die.
    DivineFail,

    /// Top 1%.
    Divine,

    /// Bottom 5%.
    Fail,

    /// Top 5%.
    Crit,

    Normal,
}

impl Outcome {
    /// Classify `result` on a die with `die` faces. Earlier bands take
    /// precedence, so on small dice a 1 is always a divine fail.
    pub fn classify(result: u32, die: u32) -> Outcome {
        let result = result as f64;
        let die = die as f64;

        if result <= (die * 0.01).ceil() {
            Outcome::DivineFail
        } else if result >= (die * 0.99 + 1.0).floor() {
            Outcome::Divine
        } else if result <= (die * 0.05).floor() {
            Outcome::Fail
        } else if result >= (die * 0.95 + 1.0).floor() {
            Outcome::Crit
        } else {
            Outcome::Normal
        }
    }

    pub fn is_notable(&self) -> bool {
        *self != Outcome::Normal
    }

    /// Divine fails are shown in bold.
    pub fn is_bold(&self) -> bool {
        *self == Outcome::DivineFail
    }

    /// CSS class name of the outcome; empty for normal results.
    pub fn class_name(&self) -> &'static str {
        match self {
            Outcome::DivineFail => "divine-fail",
            Outcome::Divine => "divine",
            Outcome::Fail => "fail",
            Outcome::Crit => "crit",
            Outcome::Normal => "",
        }
    }

    /// Full class list of a rolled die in the chat card.
    pub fn css_class(&self) -> String {
        let mut class = String::from("roll");
        if self.is_notable() {
            class.push(' ');
            class.push_str(self.class_name());
        }
        if self.is_bold() {
            class.push_str(" roll-bold");
        }
        class
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::DivineFail => write!(f, "divine fail"),
            Outcome::Divine => write!(f, "divine"),
            Outcome::Fail => write!(f, "fail"),
            Outcome::Crit => write!(f, "crit"),
            Outcome::Normal => write!(f, "normal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_sided_bands_test() {
        assert_eq!(Outcome::DivineFail, Outcome::classify(1, 40));
        assert_eq!(Outcome::Fail, Outcome::classify(2, 40));
        assert_eq!(Outcome::Normal, Outcome::classify(3, 40));
        assert_eq!(Outcome::Normal, Outcome::classify(38, 40));
        assert_eq!(Outcome::Crit, Outcome::classify(39, 40));
        assert_eq!(Outcome::Divine, Outcome::classify(40, 40));
    }

    #[test]
    fn hundred_forty_sided_bands_test() {
        assert_eq!(Outcome::DivineFail, Outcome::classify(2, 140));
        assert_eq!(Outcome::Fail, Outcome::classify(3, 140));
        assert_eq!(Outcome::Fail, Outcome::classify(7, 140));
        assert_eq!(Outcome::Normal, Outcome::classify(8, 140));
        assert_eq!(Outcome::Normal, Outcome::classify(133, 140));
        assert_eq!(Outcome::Crit, Outcome::classify(134, 140));
        assert_eq!(Outcome::Crit, Outcome::classify(138, 140));
        assert_eq!(Outcome::Divine, Outcome::classify(139, 140));
    }

    #[test]
    fn largest_skill_die_bands_test() {
        assert_eq!(Outcome::DivineFail, Outcome::classify(4, 375));
        assert_eq!(Outcome::Fail, Outcome::classify(18, 375));
        assert_eq!(Outcome::Normal, Outcome::classify(19, 375));
        assert_eq!(Outcome::Crit, Outcome::classify(357, 375));
        assert_eq!(Outcome::Divine, Outcome::classify(372, 375));
    }

    #[test]
    fn small_die_extremes_test() {
        assert_eq!(Outcome::DivineFail, Outcome::classify(1, 20));
        assert_eq!(Outcome::Normal, Outcome::classify(2, 20));
        assert_eq!(Outcome::Divine, Outcome::classify(20, 20));
    }

    #[test]
    fn css_class_test() {
        assert_eq!("roll divine-fail roll-bold", Outcome::DivineFail.css_class());
        assert_eq!("roll crit", Outcome::Crit.css_class());
        assert_eq!("roll", Outcome::Normal.css_class());
    }
}
