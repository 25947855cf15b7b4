//! Per-language prompt registry for legal query answering.
//!
//! Each template wraps the user query and the retrieved context in an
//! instruction block. Lookups for unknown language codes fall back to the
//! baseline English template.

/// Language code whose template is the fallback for every lookup.
pub const BASELINE_LANGUAGE: &str = "en";

const TEMPLATE_EN: &str = "<s>[INST] You are an expert in the Indian Penal Code (IPC).
Your job is to classify the offense, identify relevant sections, and explain the punishment based on the provided query.

QUERY: {query}

Relevant Context:
{context}

Provide the output in the following format:
- Predicted Offense: [Classified offense]
- Relevant Legal Section: [Section details]
- Punishment: [Punishment description]
- Explanation: [Legal section explanation]
</s>[INST]";

const TEMPLATE_HI: &str = "<s>[INST] आप भारतीय दंड संहिता (IPC) के विशेषज्ञ हैं।
आपका काम प्रदान किए गए प्रश्न के आधार पर अपराध को वर्गीकृत करना, प्रासंगिक धाराओं की पहचान करना और सजा की व्याख्या करना है।

प्रश्न: {query}

प्रासंगिक संदर्भ:
{context}

निम्नलिखित प्रारूप में आउटपुट प्रदान करें:
- पूर्वानुमानित अपराध: [वर्गीकृत अपराध]
- प्रासंगिक कानूनी धारा: [धारा विवरण]
- सजा: [सजा विवरण]
- व्याख्या: [कानूनी धारा व्याख्या]
</s>[INST]";

const TEMPLATE_TA: &str = "<s>[INST] நீங்கள் இந்திய தண்டனைச் சட்டம் (IPC) நிபுணர்.
உங்கள் பணி, வழங்கப்பட்ட கேள்வியின் அடிப்படையில் குற்றத்தை வகைப்படுத்துதல், தொடர்புடைய பிரிவுகளை அடையாளம் காணுதல் மற்றும் தண்டனையை விளக்குதல்.

கேள்வி: {query}

தொடர்புடைய சூழல்:
{context}

பின்வரும் வடிவத்தில் வெளியீட்டை வழங்கவும்:
- முன்னறிவிக்கப்பட்ட குற்றம்: [வகைப்படுத்தப்பட்ட குற்றம்]
- தொடர்புடைய சட்டப் பிரிவு: [பிரிவு விவரங்கள்]
- தண்டனை: [தண்டனை விளக்கம்]
- விளக்கம்: [சட்டப் பிரிவு விளக்கம்]
</s>[INST]";

const TEMPLATE_TE: &str = "<s>[INST] మీరు భారతీయ దండ స్మృతి (IPC) నిపుణుడు.
మీ పని, అందించిన ప్రశ్న ఆధారంగా నేరాన్ని వర్గీకరించడం, సంబంధిత సెక్షన్లను గుర్తించడం మరియు శిక్షను వివరించడం.

ప్రశ్న: {query}

సంబంధిత సందర్భం:
{context}

కింది ఫార్మాట్లో అవుట్పుట్ అందించండి:
- అంచనా వేసిన నేరం: [వర్గీకరించిన నేరం]
- సంబంధిత చట్టపరమైన సెక్షన్: [సెక్షన్ వివరాలు]
- శిక్ష: [శిక్ష వివరణ]
- వివరణ: [చట్టపరమైన సెక్షన్ వివరణ]
</s>[INST]";

const TEMPLATE_KN: &str = "<s>[INST] ನೀವು ಭಾರತೀಯ ದಂಡ ಸಂಹಿತೆ (IPC) ನಲ್ಲಿ ಪರಿಣಿತರು.
ನಿಮ್ಮ ಕೆಲಸವೆಂದರೆ, ಒದಗಿಸಿದ ಪ್ರಶ್ನೆಯ ಆಧಾರದ ಮೇಲೆ ಅಪರಾಧವನ್ನು ವರ್ಗೀಕರಿಸುವುದು, ಸಂಬಂಧಿತ ವಿಭಾಗಗಳನ್ನು ಗುರುತಿಸುವುದು ಮತ್ತು ಶಿಕ್ಷೆಯನ್ನು ವಿವರಿಸುವುದು.

ಪ್ರಶ್ನೆ: {query}

ಸಂಬಂಧಿತ ಸಂದರ್ಭ:
{context}

ಕೆಳಗಿನ ಫಾರ್ಮ್ಯಾಟ್ನಲ್ಲಿ ಔಟ್ಪುಟ್ ನೀಡಿ:
- ಊಹಿಸಲಾದ ಅಪರಾಧ: [ವರ್ಗೀಕರಿಸಿದ ಅಪರಾಧ]
- ಸಂಬಂಧಿತ ಕಾನೂನು ವಿಭಾಗ: [ವಿಭಾಗ ವಿವರಗಳು]
- ಶಿಕ್ಷೆ: [ಶಿಕ್ಷೆಯ ವಿವರಣೆ]
- ವಿವರಣೆ: [ಕಾನೂನು ವಿಭಾಗದ ವಿವರಣೆ]
</s>[INST]";

const TEMPLATE_ML: &str = "<s>[INST] നിങ്ങൾ ഇന്ത്യൻ ശിക്ഷാ സംഹിത (IPC) വിദഗ്ദ്ധനാണ്.
നൽകിയ ചോദ്യത്തിന്റെ അടിസ്ഥാനത്തിൽ കുറ്റകൃത്യം വർഗീകരിക്കുക, ബന്ധപ്പെട്ട വകുപ്പുകൾ തിരിച്ചറിയുക, ശിക്ഷ വിശദീകരിക്കുക എന്നതാണ് നിങ്ങളുടെ ജോലി.

ചോദ്യം: {query}

ബന്ധപ്പെട്ട സന്ദർഭം:
{context}

ഇനിപ്പറയുന്ന ഫോർമാറ്റിൽ ഔട്ട്പുട്ട് നൽകുക:
- പ്രവചിച്ച കുറ്റകൃത്യം: [വർഗീകരിച്ച കുറ്റകൃത്യം]
- ബന്ധപ്പെട്ട നിയമ വകുപ്പ്: [വകുപ്പ് വിവരങ്ങൾ]
- ശിക്ഷ: [ശിക്ഷ വിവരണം]
- വിശദീകരണം: [നിയമ വകുപ്പ് വിശദീകരണം]
</s>[INST]";

const TEMPLATE_BN: &str = "<s>[INST] আপনি ভারতীয় দণ্ডবিধি (IPC) এর বিশেষজ্ঞ।
আপনার কাজ হল প্রদত্ত প্রশ্নের ভিত্তিতে অপরাধ শ্রেণীবদ্ধ করা, প্রাসঙ্গিক ধারা চিহ্নিত করা এবং শাস্তি ব্যাখ্যা করা।

প্রশ্ন: {query}

প্রাসঙ্গিক প্রসঙ্গ:
{context}

নিম্নলিখিত ফরম্যাটে আউটপুট প্রদান করুন:
- পূর্বাভাসিত অপরাধ: [শ্রেণীবদ্ধ অপরাধ]
- প্রাসঙ্গিক আইনী ধারা: [ধারা বিবরণ]
- শাস্তি: [শাস্তি বিবরণ]
- ব্যাখ্যা: [আইনী ধারা ব্যাখ্যা]
</s>[INST]";

const TEMPLATE_MR: &str = "<s>[INST] तुम्ही भारतीय दंड संहिता (IPC) तज्ञ आहात.
तुमचे कार्य, प्रदान केलेल्या प्रश्नाच्या आधारे गुन्हा वर्गीकृत करणे, संबंधित कलमे ओळखणे आणि शिक्षेचे स्पष्टीकरण देणे.

प्रश्न: {query}

संबंधित संदर्भ:
{context}

खालील स्वरूपात आउटपुट द्या:
- अंदाजित गुन्हा: [वर्गीकृत गुन्हा]
- संबंधित कायदेशीर कलम: [कलम तपशील]
- शिक्षा: [शिक्षा वर्णन]
- स्पष्टीकरण: [कायदेशीर कलम स्पष्टीकरण]
</s>[INST]";

const TEMPLATE_GU: &str = "<s>[INST] તમે ભારતીય દંડ સંહિતા (IPC) ના નિષ્ણાત છો.
તમારું કાર્ય, પૂરા પાડેલા પ્રશ્નના આધારે ગુનાને વર્ગીકૃત કરવો, સંબંધિત વિભાગોને ઓળખવા અને સજાને સમજાવવી.

પ્રશ્ન: {query}

સંબંધિત સંદર્ભ:
{context}

નીચેના ફોર્મેટમાં આઉટપુટ આપો:
- અનુમાનિત ગુનો: [વર્ગીકૃત ગુનો]
- સંબંધિત કાનૂની વિભાગ: [વિભાગ વિગતો]
- સજા: [સજા વર્ણન]
- સમજૂતી: [કાનૂની વિભાગ સમજૂતી]
</s>[INST]";

const TEMPLATE_PA: &str = "<s>[INST] ਤੁਸੀਂ ਭਾਰਤੀ ਦੰਡ ਸੰਘਿਆ (IPC) ਦੇ ਮਾਹਿਰ ਹੋ.
ਤੁਹਾਡਾ ਕੰਮ, ਦਿੱਤੇ ਗਏ ਸਵਾਲ ਦੇ ਆਧਾਰ 'ਤੇ ਅਪਰਾਧ ਨੂੰ ਵਰਗੀਕ੍ਰਿਤ ਕਰਨਾ, ਸੰਬੰਧਿਤ ਧਾਰਾਵਾਂ ਦੀ ਪਛਾਣ ਕਰਨਾ ਅਤੇ ਸਜ਼ਾ ਦੀ ਵਿਆਖਿਆ ਕਰਨਾ ਹੈ.

ਸਵਾਲ: {query}

ਸੰਬੰਧਿਤ ਸੰਦਰਭ:
{context}

ਹੇਠ ਲਿਖੇ ਫਾਰਮੈਟ ਵਿੱਚ ਆਉਟਪੁੱਟ ਦਿਓ:
- ਅਨੁਮਾਨਿਤ ਅਪਰਾਧ: [ਵਰਗੀਕ੍ਰਿਤ ਅਪਰਾਧ]
- ਸੰਬੰਧਿਤ ਕਾਨੂੰਨੀ ਧਾਰਾ: [ਧਾਰਾ ਵੇਰਵੇ]
- ਸਜ਼ਾ: [ਸਜ਼ਾ ਵੇਰਵਾ]
- ਵਿਆਖਿਆ: [ਕਾਨੂੰਨੀ ਧਾਰਾ ਵਿਆਖਿਆ]
</s>[INST]";

/// Registry of templates keyed by request language code, baseline first.
const TEMPLATES: [(&str, &str); 10] = [
    ("en", TEMPLATE_EN),
    ("hi", TEMPLATE_HI),
    ("ta", TEMPLATE_TA),
    ("te", TEMPLATE_TE),
    ("kn", TEMPLATE_KN),
    ("ml", TEMPLATE_ML),
    ("bn", TEMPLATE_BN),
    ("mr", TEMPLATE_MR),
    ("gu", TEMPLATE_GU),
    ("pa", TEMPLATE_PA),
];

/// Language codes the registry has templates for. Matching is
/// case-sensitive, codes are lowercase ISO 639-1.
#[must_use]
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|(code, _)| *code)
}

#[must_use]
pub fn is_supported(language: &str) -> bool {
    TEMPLATES.iter().any(|(code, _)| *code == language)
}

/// Template for `language`, or the baseline template for unknown codes.
#[must_use]
pub fn template_for(language: &str) -> &'static str {
    TEMPLATES
        .iter()
        .find(|(code, _)| *code == language)
        .map_or(TEMPLATE_EN, |(_, template)| *template)
}

/// Bind the query and the retrieved context into the template for `language`.
#[must_use]
pub fn build_prompt(language: &str, query: &str, context: &str) -> String {
    template_for(language)
        .replace("{query}", query)
        .replace("{context}", context)
}
