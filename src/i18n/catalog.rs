//! Message catalog

/// Every user-visible message on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    DashboardTitle,
    PreviousDay,
    NextDay,
    Date,
    EnterDailyMetrics,
    WebsiteVisits,
    AppDownloads,
    FinishedOperations,
    Liquidity,
    AddMetric,
    MetricsFor,
    NoDataForThisDate,
    CreatedAt,
    WebsiteVisitsHeader,
    AppDownloadsHeader,
    FinishedOperationsHeader,
    LiquidityHeader,
    Actions,
    Edit,
    Delete,
    Save,
    Cancel,
    ConfirmDelete,
    Language,
    LanguageName,
    BackToDashboard,
}

pub(super) fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::DashboardTitle => "Abwaab Dashboard",
        TextKey::PreviousDay => "Previous Day",
        TextKey::NextDay => "Next Day",
        TextKey::Date => "Date",
        TextKey::EnterDailyMetrics => "Enter Daily Metrics",
        TextKey::WebsiteVisits => "Website Visits",
        TextKey::AppDownloads => "App Downloads",
        TextKey::FinishedOperations => "Finished Operations",
        TextKey::Liquidity => "Liquidity",
        TextKey::AddMetric => "Add Metric",
        TextKey::MetricsFor => "Metrics for",
        TextKey::NoDataForThisDate => "No data for this date.",
        TextKey::CreatedAt => "Created At",
        TextKey::WebsiteVisitsHeader => "Website Visits",
        TextKey::AppDownloadsHeader => "App Downloads",
        TextKey::FinishedOperationsHeader => "Finished Operations",
        TextKey::LiquidityHeader => "Liquidity",
        TextKey::Actions => "Actions",
        TextKey::Edit => "Edit",
        TextKey::Delete => "Delete",
        TextKey::Save => "Save",
        TextKey::Cancel => "Cancel",
        TextKey::ConfirmDelete => "Are you sure you want to delete this record?",
        TextKey::Language => "Language",
        TextKey::LanguageName => "English",
        TextKey::BackToDashboard => "Back to dashboard",
    }
}

pub(super) fn arabic(key: TextKey) -> Option<&'static str> {
    let text = match key {
        TextKey::DashboardTitle => "لوحة التحكم أبواب",
        TextKey::PreviousDay => "اليوم السابق",
        TextKey::NextDay => "اليوم التالي",
        TextKey::Date => "التاريخ",
        TextKey::EnterDailyMetrics => "إدخال المقاييس اليومية",
        TextKey::WebsiteVisits => "زيارات الموقع",
        TextKey::AppDownloads => "تنزيلات التطبيق",
        TextKey::FinishedOperations => "العمليات المكتملة",
        TextKey::Liquidity => "السيولة",
        TextKey::AddMetric => "إضافة مقياس",
        TextKey::MetricsFor => "مقاييس لـ",
        TextKey::NoDataForThisDate => "لا توجد بيانات لهذا التاريخ.",
        TextKey::CreatedAt => "تاريخ الإنشاء",
        TextKey::WebsiteVisitsHeader => "زيارات الموقع",
        TextKey::AppDownloadsHeader => "تنزيلات التطبيق",
        TextKey::FinishedOperationsHeader => "العمليات المكتملة",
        TextKey::LiquidityHeader => "السيولة",
        TextKey::Actions => "الإجراءات",
        TextKey::Edit => "تعديل",
        TextKey::Delete => "حذف",
        TextKey::Save => "حفظ",
        TextKey::Cancel => "إلغاء",
        TextKey::ConfirmDelete => "هل أنت متأكد أنك تريد حذف هذا السجل؟",
        TextKey::Language => "اللغة",
        TextKey::LanguageName => "العربية",
        TextKey::BackToDashboard => return None,
    };
    Some(text)
}
