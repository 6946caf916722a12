use std::fs;

use crate::domain::errors::{DomainError, DomainResult};

/// Clases COCO en el orden de índice de los modelos YOLO de Ultralytics.
pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana",
    "apple", "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza",
    "donut", "cake", "chair", "couch", "potted plant", "bed", "dining table", "toilet", "tv",
    "laptop", "mouse", "remote", "keyboard", "cell phone", "microwave", "oven", "toaster",
    "sink", "refrigerator", "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

pub fn coco_labels() -> Vec<String> {
    COCO_CLASSES.iter().map(|s| s.to_string()).collect()
}

/// Una etiqueta por línea; las líneas vacías se ignoran.
pub fn load_labels(path: &str) -> DomainResult<Vec<String>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| DomainError::NotFound(format!("labels file {path}: {e}")))?;
    let labels: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Err(DomainError::InvalidInput(format!("labels file {path} is empty")));
    }
    Ok(labels)
}

pub fn label_for(labels: &[String], class_id: usize) -> String {
    labels
        .get(class_id)
        .cloned()
        .unwrap_or_else(|| format!("class_{class_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn coco_has_eighty_classes() {
        let labels = coco_labels();
        assert_eq!(labels.len(), 80);
        assert_eq!(labels[0], "person");
        assert_eq!(labels[16], "dog");
    }

    #[test]
    fn unknown_class_falls_back_to_index() {
        assert_eq!(label_for(&coco_labels(), 80), "class_80");
    }

    #[test]
    fn labels_file_skips_blank_lines() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "cat\n\n dog \n").unwrap();
        let labels = load_labels(f.path().to_str().unwrap()).unwrap();
        assert_eq!(labels, vec!["cat".to_string(), "dog".to_string()]);
    }

    #[test]
    fn missing_labels_file_is_not_found() {
        assert!(matches!(load_labels("/nonexistent/labels.txt"), Err(DomainError::NotFound(_))));
    }
}
