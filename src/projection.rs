use crate::models::{Employee, PageResponse};

/// There is always at least one page. Requested pages outside
/// `1..=total_pages` are clamped, so the returned `page` may differ from the
/// one asked for.
pub fn project(employees: &[Employee], search_term: &str, page: usize, page_size: usize) -> PageResponse {
    let page_size = page_size.max(1);
    let needle = search_term.to_lowercase();
    let matches: Vec<&Employee> = employees
        .iter()
        .filter(|employee| name_matches(employee, &needle))
        .collect();

    let total_pages = total_pages(matches.len(), page_size);
    let page = page.clamp(1, total_pages);
    let visible = matches
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(|employee| (*employee).clone())
        .collect();

    PageResponse {
        visible,
        page,
        total_pages,
        total_matches: matches.len(),
    }
}

pub fn count_matches(employees: &[Employee], search_term: &str) -> usize {
    let needle = search_term.to_lowercase();
    employees.iter().filter(|employee| name_matches(employee, &needle)).count()
}

fn name_matches(employee: &Employee, needle: &str) -> bool {
    needle.is_empty() || employee.name.to_lowercase().contains(needle)
}

pub fn total_pages(match_count: usize, page_size: usize) -> usize {
    match_count.div_ceil(page_size.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::{project, total_pages};
    use crate::models::{Employee, EmployeeId};

    fn named(names: &[&str]) -> Vec<Employee> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Employee {
                id: EmployeeId::Number(index as u64 + 1),
                name: name.to_string(),
                phone: "0812".to_string(),
                division: "Ops".to_string(),
                position: "Staff".to_string(),
            })
            .collect()
    }

    fn names(page: &crate::models::PageResponse) -> Vec<&str> {
        page.visible.iter().map(|employee| employee.name.as_str()).collect()
    }

    #[test]
    fn six_records_span_two_pages_of_five() {
        let employees = named(&["A", "B", "C", "D", "E", "F"]);

        let first = project(&employees, "", 1, 5);
        assert_eq!(names(&first), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(first.total_pages, 2);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let second = project(&employees, "", 2, 5);
        assert_eq!(names(&second), vec!["F"]);
        assert_eq!(second.label(), "Page 2 of 2");
        assert!(!second.has_next());
    }

    #[test]
    fn search_is_case_insensitive_substring_on_name() {
        let employees = named(&["Bob", "Abe", "Cara"]);
        let result = project(&employees, "b", 1, 5);
        assert_eq!(names(&result), vec!["Bob", "Abe"]);
        assert_eq!(result.total_matches, 2);

        let result = project(&employees, "BO", 1, 5);
        assert_eq!(names(&result), vec!["Bob"]);

        let result = project(&employees, "car", 1, 5);
        assert_eq!(names(&result), vec!["Cara"]);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let employees = named(&["A", "B", "C", "D", "E", "F", "G"]);
        let last = project(&employees, "", 3, 3);
        assert_eq!(project(&employees, "", 9999, 3), last);
        assert_eq!(project(&employees, "", 0, 3), project(&employees, "", 1, 3));
        assert_eq!(last.page, 3);
    }

    #[test]
    fn no_matches_is_a_single_empty_page() {
        let employees = named(&["Ana"]);
        let result = project(&employees, "zzz", 4, 5);
        assert!(result.is_empty());
        assert_eq!(result.page, 1);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.label(), "Page 1 of 1");

        let empty = project(&[], "", 1, 5);
        assert!(empty.is_empty());
        assert_eq!(empty.total_pages, 1);
    }

    #[test]
    fn projection_is_deterministic() {
        let employees = named(&["Ana", "Andi", "Budi", "Anton"]);
        assert_eq!(project(&employees, "an", 2, 2), project(&employees, "an", 2, 2));
        assert_eq!(names(&project(&employees, "an", 2, 2)), vec!["Anton"]);
    }

    #[test]
    fn page_count_matches_ceiling_division() {
        for len in 0..23usize {
            let employees = named(&vec!["x"; len]);
            for page_size in 1..7usize {
                let expected = if len == 0 { 1 } else { (len + page_size - 1) / page_size };
                assert_eq!(total_pages(len, page_size), expected);
                for page in 1..=expected {
                    let result = project(&employees, "", page, page_size);
                    let start = (page - 1) * page_size;
                    let end = (start + page_size).min(len);
                    assert_eq!(result.visible, employees[start..end].to_vec());
                }
            }
        }
    }
}
